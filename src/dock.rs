//! The dock: one slot per catalog app along the configured screen edge.
//!
//! Clicks queue launches the desktop drains with `take_launches`. With
//! autohide on, the dock stays hidden until the pointer touches its edge and
//! hides again once the pointer leaves it.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::apps::{AppCatalog, AppId};
use crate::constants::DOCK_THICKNESS;
use crate::layout::rect_contains;
use crate::settings::{DockPosition, DockSettings};
use crate::theme::Palette;
use crate::ui::{UiFrame, centered_offset};

const SIDE_ITEM_HEIGHT: u16 = 2;

/// Rows (bottom) or columns (sides) the dock reserves for `size`.
pub fn dock_thickness(position: DockPosition, size: u8) -> u16 {
    let size = u16::from(size.max(1));
    match position {
        DockPosition::Bottom => DOCK_THICKNESS + size - 1,
        DockPosition::Left | DockPosition::Right => 3 + size,
    }
}

fn item_length(settings: &DockSettings) -> u16 {
    match settings.position {
        DockPosition::Bottom => 3 + u16::from(settings.size.max(1)),
        DockPosition::Left | DockPosition::Right => SIDE_ITEM_HEIGHT,
    }
}

/// Hit rect of each slot, centered along the edge.
pub fn item_rects(region: Rect, settings: &DockSettings, count: usize) -> Vec<Rect> {
    let len = item_length(settings);
    let total = len.saturating_mul(count as u16);
    match settings.position {
        DockPosition::Bottom => {
            let start = region.x + region.width.saturating_sub(total) / 2;
            (0..count as u16)
                .map(|i| Rect::new(start + i * len, region.y, len, region.height))
                .map(|rect| rect.intersection(region))
                .collect()
        }
        DockPosition::Left | DockPosition::Right => {
            let start = region.y + region.height.saturating_sub(total) / 2;
            (0..count as u16)
                .map(|i| Rect::new(region.x, start + i * len, region.width, len))
                .map(|rect| rect.intersection(region))
                .collect()
        }
    }
}

/// Running and focus state the dock renders from.
#[derive(Debug, Clone, Copy)]
pub struct DockState<'a> {
    pub running: &'a [AppId],
    pub focused: Option<AppId>,
}

#[derive(Debug, Default)]
pub struct Dock {
    hovered: Option<AppId>,
    revealed: bool,
    launches: Vec<AppId>,
}

impl Dock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apps(&self) -> Vec<AppId> {
        AppCatalog.dock_apps().map(|d| d.id).collect()
    }

    pub fn hovered(&self) -> Option<AppId> {
        self.hovered
    }

    pub fn is_visible(&self, settings: &DockSettings) -> bool {
        !settings.autohide || self.revealed
    }

    pub fn take_launches(&mut self) -> Vec<AppId> {
        std::mem::take(&mut self.launches)
    }

    pub fn app_at(&self, region: Rect, settings: &DockSettings, column: u16, row: u16) -> Option<AppId> {
        let apps = self.apps();
        item_rects(region, settings, apps.len())
            .into_iter()
            .zip(apps)
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, app)| app)
    }

    fn touches_edge(region: Rect, settings: &DockSettings, column: u16, row: u16) -> bool {
        match settings.position {
            DockPosition::Bottom => row + 1 >= region.bottom(),
            DockPosition::Left => column <= region.x,
            DockPosition::Right => column + 1 >= region.right(),
        }
    }

    /// Mouse routing. Returns whether the dock consumed the event; moves only
    /// update hover state and are never consumed.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, region: Rect, settings: &DockSettings) -> bool {
        let inside = rect_contains(region, mouse.column, mouse.row);
        if settings.autohide {
            let was = self.revealed;
            if inside && Self::touches_edge(region, settings, mouse.column, mouse.row) {
                self.revealed = true;
            } else if !inside {
                self.revealed = false;
            }
            if was != self.revealed {
                tracing::trace!(revealed = self.revealed, "dock autohide");
            }
        } else {
            self.revealed = false;
        }
        if !self.is_visible(settings) {
            self.hovered = None;
            return false;
        }
        self.hovered = inside
            .then(|| self.app_at(region, settings, mouse.column, mouse.row))
            .flatten();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                if let Some(app) = self.hovered {
                    tracing::debug!(%app, "dock launch");
                    self.launches.push(app);
                }
                true
            }
            MouseEventKind::Down(_) | MouseEventKind::Up(_) => inside,
            _ => false,
        }
    }

    pub fn render(
        &self,
        frame: &mut UiFrame<'_>,
        region: Rect,
        settings: &DockSettings,
        state: DockState<'_>,
        palette: &Palette,
    ) {
        if !self.is_visible(settings) || region.width == 0 || region.height == 0 {
            return;
        }
        let apps = self.apps();
        let rects = item_rects(region, settings, apps.len());
        let shelf = shelf_rect(region, settings, &rects);
        frame.fill(shelf, palette.dock());

        for (rect, app) in rects.iter().zip(apps.iter()) {
            let Some(descriptor) = AppCatalog.get(*app) else {
                continue;
            };
            let hovered = self.hovered == Some(*app);
            let magnified = hovered && settings.magnification;
            let mut style = palette.dock();
            if state.focused == Some(*app) {
                style = style.bg(palette.dock_active_bg);
            }
            if magnified {
                style = style.add_modifier(Modifier::BOLD);
            }
            let dot_style = Style::default()
                .bg(palette.dock_bg)
                .fg(palette.dock_indicator);
            let running = state.running.contains(app);
            match settings.position {
                DockPosition::Bottom => {
                    let dot_y = rect.bottom().saturating_sub(1);
                    let lift = u16::from(magnified && rect.height >= 3);
                    let icon_y = dot_y.saturating_sub(1 + lift);
                    let cell = Rect::new(rect.x + 1, icon_y, rect.width.saturating_sub(2), 1);
                    frame.fill(cell, style);
                    let x = cell.x + centered_offset(descriptor.icon, cell.width);
                    frame.set_string(cell, x, icon_y, descriptor.icon, style);
                    if running {
                        let x = rect.x + centered_offset("•", rect.width);
                        frame.set_string(*rect, x, dot_y, "•", dot_style);
                    }
                }
                DockPosition::Left | DockPosition::Right => {
                    let inward: i32 = if settings.position == DockPosition::Left { 1 } else { -1 };
                    let center = rect.x + rect.width / 2;
                    let shift = if magnified { inward } else { 0 };
                    let x = (i32::from(center) + shift).max(i32::from(rect.x)) as u16;
                    let cell = Rect::new(x.saturating_sub(1), rect.y, 3, 1).intersection(*rect);
                    frame.fill(cell, style);
                    frame.set_string(*rect, x, rect.y, descriptor.icon, style);
                    if running {
                        let dot_x = if settings.position == DockPosition::Left {
                            rect.x
                        } else {
                            rect.right().saturating_sub(1)
                        };
                        frame.set_string(*rect, dot_x, rect.y, "•", dot_style);
                    }
                }
            }
            if hovered {
                render_tooltip(frame, *rect, settings.position, descriptor.name, palette);
            }
        }
    }
}

fn shelf_rect(region: Rect, settings: &DockSettings, rects: &[Rect]) -> Rect {
    let (Some(first), Some(last)) = (rects.first(), rects.last()) else {
        return region;
    };
    match settings.position {
        DockPosition::Bottom => {
            let x = first.x.saturating_sub(1).max(region.x);
            let right = last.right().saturating_add(1).min(region.right());
            Rect::new(x, region.y, right - x, region.height)
        }
        DockPosition::Left | DockPosition::Right => {
            let y = first.y.saturating_sub(1).max(region.y);
            let bottom = last.bottom().saturating_add(1).min(region.bottom());
            Rect::new(region.x, y, region.width, bottom - y)
        }
    }
}

fn render_tooltip(frame: &mut UiFrame<'_>, item: Rect, position: DockPosition, name: &str, palette: &Palette) {
    let screen = frame.area();
    let label = format!(" {name} ");
    let width = label.chars().count() as u16;
    let (x, y) = match position {
        DockPosition::Bottom => {
            let center = item.x + item.width / 2;
            (center.saturating_sub(width / 2), item.y.saturating_sub(1))
        }
        DockPosition::Left => (item.right(), item.y),
        DockPosition::Right => (item.x.saturating_sub(width), item.y),
    };
    if y == item.y && position == DockPosition::Bottom {
        return;
    }
    frame.set_string(screen, x, y, &label, palette.menu());
}
