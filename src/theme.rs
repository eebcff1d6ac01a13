use ratatui::style::{Color, Modifier, Style};

use crate::settings::ThemeMode;

// Centralized theme colors. Views look up the palette for the active theme
// mode on every render.

/// Traffic-light button colors, shared by both modes.
pub fn close_button() -> Color {
    Color::Rgb(255, 95, 87)
}
pub fn minimize_button() -> Color {
    Color::Rgb(254, 188, 46)
}
pub fn zoom_button() -> Color {
    Color::Rgb(40, 200, 64)
}
pub fn accent() -> Color {
    Color::Rgb(10, 132, 255)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub desktop_bg: Color,
    pub desktop_fg: Color,
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub menu_selected_bg: Color,
    pub menu_selected_fg: Color,
    pub menu_disabled_fg: Color,
    pub dock_bg: Color,
    pub dock_fg: Color,
    pub dock_active_bg: Color,
    pub dock_indicator: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub header_focused_bg: Color,
    pub header_focused_fg: Color,
    pub border: Color,
    pub border_focused: Color,
    pub window_bg: Color,
    pub window_fg: Color,
    pub muted_fg: Color,
}

const LIGHT: Palette = Palette {
    desktop_bg: Color::Rgb(58, 110, 165),
    desktop_fg: Color::Rgb(120, 160, 200),
    menu_bg: Color::Rgb(236, 236, 236),
    menu_fg: Color::Black,
    menu_selected_bg: Color::Rgb(10, 132, 255),
    menu_selected_fg: Color::White,
    menu_disabled_fg: Color::Gray,
    dock_bg: Color::Rgb(220, 220, 225),
    dock_fg: Color::Black,
    dock_active_bg: Color::Rgb(190, 190, 200),
    dock_indicator: Color::Black,
    header_bg: Color::Rgb(225, 225, 225),
    header_fg: Color::DarkGray,
    header_focused_bg: Color::Rgb(210, 210, 210),
    header_focused_fg: Color::Black,
    border: Color::Gray,
    border_focused: Color::DarkGray,
    window_bg: Color::White,
    window_fg: Color::Black,
    muted_fg: Color::DarkGray,
};

const DARK: Palette = Palette {
    desktop_bg: Color::Rgb(28, 28, 46),
    desktop_fg: Color::Rgb(60, 60, 90),
    menu_bg: Color::Rgb(40, 40, 40),
    menu_fg: Color::White,
    menu_selected_bg: Color::Rgb(10, 132, 255),
    menu_selected_fg: Color::White,
    menu_disabled_fg: Color::DarkGray,
    dock_bg: Color::Rgb(50, 50, 55),
    dock_fg: Color::White,
    dock_active_bg: Color::Rgb(80, 80, 90),
    dock_indicator: Color::White,
    header_bg: Color::Rgb(45, 45, 45),
    header_fg: Color::Gray,
    header_focused_bg: Color::Rgb(60, 60, 60),
    header_focused_fg: Color::White,
    border: Color::DarkGray,
    border_focused: Color::Gray,
    window_bg: Color::Rgb(30, 30, 30),
    window_fg: Color::White,
    muted_fg: Color::Gray,
};

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> &'static Palette {
        match mode {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }

    pub fn menu(&self) -> Style {
        Style::default().bg(self.menu_bg).fg(self.menu_fg)
    }

    pub fn menu_selected(&self) -> Style {
        Style::default()
            .bg(self.menu_selected_bg)
            .fg(self.menu_selected_fg)
    }

    pub fn header(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .bg(self.header_focused_bg)
                .fg(self.header_focused_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(self.header_bg).fg(self.header_fg)
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        let fg = if focused {
            self.border_focused
        } else {
            self.border
        };
        Style::default().fg(fg).bg(self.window_bg)
    }

    pub fn window(&self) -> Style {
        Style::default().bg(self.window_bg).fg(self.window_fg)
    }

    pub fn desktop(&self) -> Style {
        Style::default().bg(self.desktop_bg).fg(self.desktop_fg)
    }

    pub fn dock(&self) -> Style {
        Style::default().bg(self.dock_bg).fg(self.dock_fg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_have_distinct_window_backgrounds() {
        assert_ne!(
            Palette::for_mode(ThemeMode::Light).window_bg,
            Palette::for_mode(ThemeMode::Dark).window_bg
        );
    }

    #[test]
    fn focused_header_is_bold() {
        let palette = Palette::for_mode(ThemeMode::Dark);
        assert!(palette.header(true).add_modifier.contains(Modifier::BOLD));
        assert!(!palette.header(false).add_modifier.contains(Modifier::BOLD));
    }
}
