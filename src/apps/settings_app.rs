//! System Settings: one row per setting. The rows read the live settings
//! from the context and send changes back to the desktop as requests.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use crate::components::{AppRequest, Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::settings::{
    DockPosition, MAX_DOCK_SIZE, MIN_DOCK_SIZE, SettingsChange, SystemSettings, ThemeMode,
};
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingRow {
    Appearance,
    Wallpaper,
    ShowClock,
    DockSize,
    DockPosition,
    Magnification,
    Autohide,
    Reset,
}

impl SettingRow {
    pub const ALL: [SettingRow; 8] = [
        SettingRow::Appearance,
        SettingRow::Wallpaper,
        SettingRow::ShowClock,
        SettingRow::DockSize,
        SettingRow::DockPosition,
        SettingRow::Magnification,
        SettingRow::Autohide,
        SettingRow::Reset,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingRow::Appearance => "Appearance",
            SettingRow::Wallpaper => "Wallpaper",
            SettingRow::ShowClock => "Show clock in menu bar",
            SettingRow::DockSize => "Dock size",
            SettingRow::DockPosition => "Position on screen",
            SettingRow::Magnification => "Magnification",
            SettingRow::Autohide => "Automatically hide the Dock",
            SettingRow::Reset => "Reset to defaults",
        }
    }

    pub fn value(self, settings: &SystemSettings) -> String {
        let on_off = |flag: bool| if flag { "On" } else { "Off" }.to_string();
        match self {
            SettingRow::Appearance => settings.theme.label().to_string(),
            SettingRow::Wallpaper => settings.wallpaper.label().to_string(),
            SettingRow::ShowClock => on_off(settings.show_clock),
            SettingRow::DockSize => {
                let filled = usize::from(settings.dock.size);
                let empty = usize::from(MAX_DOCK_SIZE).saturating_sub(filled);
                format!("{}{}", "■".repeat(filled), "□".repeat(empty))
            }
            SettingRow::DockPosition => settings.dock.position.label().to_string(),
            SettingRow::Magnification => on_off(settings.dock.magnification),
            SettingRow::Autohide => on_off(settings.dock.autohide),
            SettingRow::Reset => String::new(),
        }
    }

    /// The change this row makes when stepped forward or back.
    pub fn change(self, settings: &SystemSettings, forward: bool) -> SettingsChange {
        match self {
            SettingRow::Appearance => SettingsChange::Theme(match settings.theme {
                ThemeMode::Light => ThemeMode::Dark,
                ThemeMode::Dark => ThemeMode::Light,
            }),
            SettingRow::Wallpaper => SettingsChange::Wallpaper(if forward {
                settings.wallpaper.next()
            } else {
                settings.wallpaper.prev()
            }),
            SettingRow::ShowClock => SettingsChange::ShowClock(!settings.show_clock),
            SettingRow::DockSize => {
                let size = settings.dock.size;
                SettingsChange::DockSize(if forward {
                    if size >= MAX_DOCK_SIZE { MIN_DOCK_SIZE } else { size + 1 }
                } else {
                    size.saturating_sub(1).max(MIN_DOCK_SIZE)
                })
            }
            SettingRow::DockPosition => {
                let all = DockPosition::ALL;
                let idx = all
                    .iter()
                    .position(|p| *p == settings.dock.position)
                    .unwrap_or(0);
                let next = if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                };
                SettingsChange::DockPosition(all[next])
            }
            SettingRow::Magnification => {
                SettingsChange::DockMagnification(!settings.dock.magnification)
            }
            SettingRow::Autohide => SettingsChange::DockAutohide(!settings.dock.autohide),
            SettingRow::Reset => SettingsChange::Reset,
        }
    }
}

pub struct SettingsApp {
    list: ListState,
    requests: Vec<AppRequest>,
    keys: KeyBindings,
}

// Heading row, then a blank row.
const ROWS_TOP: u16 = 2;

impl SettingsApp {
    pub fn new() -> Self {
        Self {
            list: ListState::default().with_selected(Some(0)),
            requests: Vec::new(),
            keys: KeyBindings::default(),
        }
    }

    pub fn selected_row(&self) -> SettingRow {
        SettingRow::ALL[self.list.selected().unwrap_or(0).min(SettingRow::ALL.len() - 1)]
    }

    fn step(&mut self, settings: &SystemSettings, forward: bool) -> bool {
        let change = self.selected_row().change(settings, forward);
        self.requests.push(AppRequest::Settings(change));
        true
    }

    fn bump_selection(&mut self, delta: isize) {
        let current = self.list.selected().unwrap_or(0);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            (current + delta as usize).min(SettingRow::ALL.len() - 1)
        };
        self.list.select(Some(next));
    }
}

impl Default for SettingsApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SettingsApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        if area.height == 0 {
            return;
        }
        frame.set_string(
            area,
            area.x + 1,
            area.y,
            "Desktop & Dock",
            palette.window().add_modifier(Modifier::BOLD),
        );
        let settings = ctx.settings();
        let value_col = usize::from(area.width.saturating_sub(2)).saturating_sub(12);
        let items: Vec<ListItem> = SettingRow::ALL
            .iter()
            .map(|row| {
                let label = format!(" {:<w$}", row.label(), w = value_col);
                ListItem::new(Line::from(vec![
                    Span::raw(label),
                    Span::styled(row.value(settings), Style::default().fg(crate::theme::accent())),
                ]))
            })
            .collect();
        let highlight = if ctx.focused() {
            palette.menu_selected()
        } else {
            palette.window().add_modifier(Modifier::REVERSED)
        };
        let list = List::new(items).style(palette.window()).highlight_style(highlight);
        let rows = Rect {
            y: area.y.saturating_add(ROWS_TOP),
            height: area.height.saturating_sub(ROWS_TOP),
            ..area
        };
        frame.render_stateful_widget(list, rows, &mut self.list);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext<'_>) -> bool {
        let settings = ctx.settings();
        match event {
            Event::Key(key) => {
                if self.keys.matches(Action::SelectPrev, key) {
                    self.bump_selection(-1);
                    true
                } else if self.keys.matches(Action::SelectNext, key) {
                    self.bump_selection(1);
                    true
                } else if self.keys.matches(Action::Activate, key)
                    || self.keys.matches(Action::ToggleSelection, key)
                    || self.keys.matches(Action::SelectRight, key)
                {
                    self.step(settings, true)
                } else if self.keys.matches(Action::SelectLeft, key) {
                    self.step(settings, false)
                } else {
                    false
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(idx) = mouse.row.checked_sub(ROWS_TOP).map(usize::from) else {
                    return false;
                };
                let idx = idx + self.list.offset();
                if idx >= SettingRow::ALL.len() {
                    return false;
                }
                self.list.select(Some(idx));
                self.step(settings, true)
            }
            _ => false,
        }
    }

    fn take_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Wallpaper;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn rows_step_from_the_live_settings() {
        let settings = SystemSettings::default();
        assert_eq!(
            SettingRow::Appearance.change(&settings, true),
            SettingsChange::Theme(ThemeMode::Dark)
        );
        assert_eq!(
            SettingRow::DockSize.change(&settings, true),
            SettingsChange::DockSize(3)
        );
        assert_eq!(
            SettingRow::DockSize.change(&settings, false),
            SettingsChange::DockSize(1)
        );
        assert_eq!(
            SettingRow::DockPosition.change(&settings, false),
            SettingsChange::DockPosition(DockPosition::Right)
        );
        assert_eq!(
            SettingRow::Wallpaper.change(&settings, false),
            SettingsChange::Wallpaper(Wallpaper::Grid)
        );
    }

    #[test]
    fn keys_emit_requests_that_the_desktop_applies() {
        let mut settings = SystemSettings::default();
        let mut app = SettingsApp::new();
        {
            let ctx = ComponentContext::new(true, &settings);
            assert!(app.handle_event(&key(KeyCode::Enter), &ctx));
        }
        for request in app.take_requests() {
            if let AppRequest::Settings(change) = request {
                settings.apply(change);
            }
        }
        assert_eq!(settings.theme, ThemeMode::Dark);

        let ctx = ComponentContext::new(true, &settings);
        for _ in 0..SettingRow::ALL.len() {
            app.handle_event(&key(KeyCode::Down), &ctx);
        }
        assert_eq!(app.selected_row(), SettingRow::Reset);
        assert!(app.handle_event(&key(KeyCode::Char(' ')), &ctx));
        assert_eq!(
            app.take_requests(),
            vec![AppRequest::Settings(SettingsChange::Reset)]
        );
    }

    #[test]
    fn clicking_a_row_selects_and_steps_it() {
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        let mut app = SettingsApp::new();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: ROWS_TOP + 6,
            modifiers: KeyModifiers::NONE,
        });
        assert!(app.handle_event(&click, &ctx));
        assert_eq!(app.selected_row(), SettingRow::Autohide);
        assert_eq!(
            app.take_requests(),
            vec![AppRequest::Settings(SettingsChange::DockAutohide(true))]
        );
    }
}
