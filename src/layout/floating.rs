use ratatui::prelude::Rect;

use super::TitleButton;
use crate::geometry::ResizeDirection;
use crate::viewport::clip_rect;
use crate::window::FloatRect;

/// Title bar and buttons need at least this many columns.
pub const CHROME_MIN_WIDTH: u16 = 9;
/// Border, title row, border.
pub const CHROME_MIN_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub rect: Rect,
    pub direction: ResizeDirection,
}

fn signed(x: i32, y: i32, width: i32, height: i32) -> FloatRect {
    FloatRect {
        x,
        y,
        width: width.max(0) as u16,
        height: height.max(0) as u16,
    }
}

/// Eight handles along the border of `rect`, clipped to `bounds`.
pub fn resize_handles_for_region(rect: FloatRect, bounds: Rect) -> Vec<ResizeHandle> {
    if rect.width < 2 || rect.height < 2 {
        return Vec::new();
    }
    let width = i32::from(rect.width);
    let height = i32::from(rect.height);
    let right = rect.x + width - 1;
    let bottom = rect.y + height - 1;
    let zones = [
        (signed(rect.x, rect.y, 1, 1), ResizeDirection::TopLeft),
        (signed(right, rect.y, 1, 1), ResizeDirection::TopRight),
        (signed(rect.x, bottom, 1, 1), ResizeDirection::BottomLeft),
        (signed(right, bottom, 1, 1), ResizeDirection::BottomRight),
        (signed(rect.x + 1, rect.y, width - 2, 1), ResizeDirection::Top),
        (signed(rect.x + 1, bottom, width - 2, 1), ResizeDirection::Bottom),
        (signed(rect.x, rect.y + 1, 1, height - 2), ResizeDirection::Left),
        (signed(right, rect.y + 1, 1, height - 2), ResizeDirection::Right),
    ];
    zones
        .into_iter()
        .filter_map(|(zone, direction)| {
            clip_rect(zone, bounds).map(|rect| ResizeHandle { rect, direction })
        })
        .collect()
}

/// The title row inside the top border.
pub fn title_bar_for_region(rect: FloatRect, bounds: Rect) -> Option<Rect> {
    if rect.width < 3 || rect.height < CHROME_MIN_HEIGHT {
        return None;
    }
    clip_rect(
        signed(rect.x + 1, rect.y + 1, i32::from(rect.width) - 2, 1),
        bounds,
    )
}

/// Close, minimize and zoom buttons at the left of the title row.
pub fn title_buttons_for_region(rect: FloatRect, bounds: Rect) -> Vec<(TitleButton, Rect)> {
    if rect.width < CHROME_MIN_WIDTH || rect.height < CHROME_MIN_HEIGHT {
        return Vec::new();
    }
    TitleButton::ALL
        .into_iter()
        .enumerate()
        .filter_map(|(slot, button)| {
            let x = rect.x + 2 + 2 * slot as i32;
            clip_rect(signed(x, rect.y + 1, 1, 1), bounds).map(|r| (button, r))
        })
        .collect()
}

/// Rect handed to the hosted app, below the title row and inside the border.
pub fn content_for_region(rect: FloatRect) -> FloatRect {
    signed(
        rect.x + 1,
        rect.y + 2,
        i32::from(rect.width) - 2,
        i32::from(rect.height) - 3,
    )
}
