use ratatui::prelude::Rect;
use ratatui::style::{Color, Style};

use crate::layout::{TitleButton, WindowHit};
use crate::theme::{self, Palette};
use crate::ui::{UiFrame, centered_offset};
use crate::window::FloatRect;

/// What a press on the window chrome asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    None,
    Close,
    Minimize,
    Maximize,
    Drag,
}

impl HeaderAction {
    pub fn from_hit(hit: WindowHit, maximized: bool) -> Self {
        match hit {
            WindowHit::Button(TitleButton::Close) => HeaderAction::Close,
            WindowHit::Button(TitleButton::Minimize) => HeaderAction::Minimize,
            WindowHit::Button(TitleButton::Zoom) => HeaderAction::Maximize,
            WindowHit::TitleBar if !maximized => HeaderAction::Drag,
            _ => HeaderAction::None,
        }
    }
}

/// Everything the decorator needs to paint one window.
#[derive(Debug, Clone, Copy)]
pub struct WindowChrome<'a> {
    pub outer: FloatRect,
    pub bounds: Rect,
    pub title: &'a str,
    pub icon: &'a str,
    pub focused: bool,
    /// Draw the border with heavy glyphs while it is being resized.
    pub highlight: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, frame: &mut UiFrame<'_>, chrome: &WindowChrome<'_>, palette: &Palette);
}

#[derive(Debug, Default)]
pub struct TrafficLightDecorator;

fn put(frame: &mut UiFrame<'_>, bounds: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    if x < i32::from(bounds.x)
        || y < i32::from(bounds.y)
        || x >= i32::from(bounds.right())
        || y >= i32::from(bounds.bottom())
    {
        return;
    }
    if let Some(cell) = frame.buffer_mut().cell_mut((x as u16, y as u16)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

impl WindowDecorator for TrafficLightDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, chrome: &WindowChrome<'_>, palette: &Palette) {
        let outer = chrome.outer;
        if outer.width < 2 || outer.height < 2 {
            return;
        }
        let bounds = chrome.bounds;
        let border_style = palette.border(chrome.focused);
        let header_style = palette.header(chrome.focused);
        let left = outer.x;
        let top = outer.y;
        let right = outer.x + i32::from(outer.width) - 1;
        let bottom = outer.y + i32::from(outer.height) - 1;
        let header_y = top + 1;

        let (h, v, tl, tr, bl, br) = if chrome.highlight {
            ("═", "║", "╔", "╗", "╚", "╝")
        } else {
            ("─", "│", "┌", "┐", "└", "┘")
        };

        // Header background
        if header_y < bottom {
            for x in left + 1..right {
                put(frame, bounds, x, header_y, " ", header_style);
            }
        }

        // Title, centered after the buttons
        let label = if chrome.icon.is_empty() {
            chrome.title.to_string()
        } else {
            format!("{} {}", chrome.icon, chrome.title)
        };
        let buttons_end = left + 8;
        let span = right - buttons_end;
        if header_y < bottom && span > 0 {
            let span = span.min(i32::from(u16::MAX)) as u16;
            let start = buttons_end + i32::from(centered_offset(&label, span));
            for (idx, ch) in label.chars().take(usize::from(span)).enumerate() {
                let mut buf = [0u8; 4];
                put(frame, bounds, start + idx as i32, header_y, ch.encode_utf8(&mut buf), header_style);
            }
        }

        // Traffic lights
        if outer.width >= crate::layout::floating::CHROME_MIN_WIDTH && header_y < bottom {
            let colors = [theme::close_button(), theme::minimize_button(), theme::zoom_button()];
            for (slot, color) in colors.into_iter().enumerate() {
                let fg = if chrome.focused { color } else { Color::Gray };
                put(frame, bounds, left + 2 + 2 * slot as i32, header_y, "●", header_style.fg(fg));
            }
        }

        // Borders
        for x in left..=right {
            let (top_symbol, bottom_symbol) = if x == left {
                (tl, bl)
            } else if x == right {
                (tr, br)
            } else {
                (h, h)
            };
            put(frame, bounds, x, top, top_symbol, border_style);
            put(frame, bounds, x, bottom, bottom_symbol, border_style);
        }
        for y in top + 1..bottom {
            put(frame, bounds, left, y, v, border_style);
            put(frame, bounds, right, y, v, border_style);
        }
    }
}
