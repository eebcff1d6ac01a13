//! Screen regions and per-window hit zones, rebuilt every frame.

pub mod floating;

use ratatui::prelude::Rect;

use crate::constants::MENU_BAR_HEIGHT;
use crate::dock::dock_thickness;
use crate::geometry::ResizeDirection;
use crate::settings::{DockPosition, SystemSettings};
use crate::viewport::clip_rect;
use crate::window::{FloatRect, WindowId};

use floating::{
    ResizeHandle, content_for_region, resize_handles_for_region, title_bar_for_region,
    title_buttons_for_region,
};

/// Fixed desktop regions for one screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopRegions {
    pub screen: Rect,
    pub menu_bar: Rect,
    pub dock: Rect,
    /// Where windows live; maximized windows fill it.
    pub work_area: Rect,
}

impl DesktopRegions {
    pub fn compute(screen: Rect, settings: &SystemSettings) -> Self {
        let menu_height = MENU_BAR_HEIGHT.min(screen.height);
        let menu_bar = Rect {
            height: menu_height,
            ..screen
        };
        let below = Rect {
            y: screen.y + menu_height,
            height: screen.height - menu_height,
            ..screen
        };
        let thickness = dock_thickness(settings.dock.position, settings.dock.size);
        let (dock, rest) = match settings.dock.position {
            DockPosition::Bottom => {
                let t = thickness.min(below.height);
                (
                    Rect {
                        y: below.bottom() - t,
                        height: t,
                        ..below
                    },
                    Rect {
                        height: below.height - t,
                        ..below
                    },
                )
            }
            DockPosition::Left => {
                let t = thickness.min(below.width);
                (
                    Rect { width: t, ..below },
                    Rect {
                        x: below.x + t,
                        width: below.width - t,
                        ..below
                    },
                )
            }
            DockPosition::Right => {
                let t = thickness.min(below.width);
                (
                    Rect {
                        x: below.right() - t,
                        width: t,
                        ..below
                    },
                    Rect {
                        width: below.width - t,
                        ..below
                    },
                )
            }
        };
        // An autohiding dock floats over the work area.
        let work_area = if settings.dock.autohide { below } else { rest };
        Self {
            screen,
            menu_bar,
            dock,
            work_area,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleButton {
    Close,
    Minimize,
    Zoom,
}

impl TitleButton {
    pub const ALL: [TitleButton; 3] = [TitleButton::Close, TitleButton::Minimize, TitleButton::Zoom];
}

/// What a pointer press landed on inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowHit {
    Button(TitleButton),
    TitleBar,
    Resize(ResizeDirection),
    Content,
    /// Border cells that carry no handle, e.g. on a maximized window.
    Chrome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowZones {
    pub id: WindowId,
    pub outer: FloatRect,
    pub visible: Rect,
    pub title_bar: Option<Rect>,
    pub buttons: Vec<(TitleButton, Rect)>,
    pub handles: Vec<ResizeHandle>,
    pub content: FloatRect,
}

impl WindowZones {
    pub fn build(id: WindowId, outer: FloatRect, bounds: Rect, resizable: bool) -> Option<Self> {
        let visible = clip_rect(outer, bounds)?;
        let handles = if resizable {
            resize_handles_for_region(outer, bounds)
        } else {
            Vec::new()
        };
        Some(Self {
            id,
            outer,
            visible,
            title_bar: title_bar_for_region(outer, bounds),
            buttons: title_buttons_for_region(outer, bounds),
            handles,
            content: content_for_region(outer),
        })
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<WindowHit> {
        if !rect_contains(self.visible, column, row) {
            return None;
        }
        if let Some((button, _)) = self
            .buttons
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
        {
            return Some(WindowHit::Button(*button));
        }
        if let Some(handle) = self
            .handles
            .iter()
            .find(|handle| rect_contains(handle.rect, column, row))
        {
            return Some(WindowHit::Resize(handle.direction));
        }
        if self
            .title_bar
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(WindowHit::TitleBar);
        }
        if clip_rect(self.content, self.visible).is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(WindowHit::Content);
        }
        Some(WindowHit::Chrome)
    }
}

/// Window zones in stacking order, bottom first.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    zones: Vec<WindowZones>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn push(&mut self, zones: WindowZones) {
        self.zones.push(zones);
    }

    pub fn get(&self, id: &WindowId) -> Option<&WindowZones> {
        self.zones.iter().find(|zones| &zones.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowZones> {
        self.zones.iter()
    }

    /// Topmost window under the cell.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<(&WindowId, WindowHit)> {
        self.zones
            .iter()
            .rev()
            .find_map(|zones| zones.hit(column, row).map(|hit| (&zones.id, hit)))
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}
