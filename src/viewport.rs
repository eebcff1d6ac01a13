//! Mapping between terminal cells and logical pixels.

use ratatui::prelude::Rect;

use crate::constants::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};
use crate::geometry::{Position, Size};
use crate::window::FloatRect;

/// Logical pixels per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
        }
    }
}

impl CellMetrics {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Logical point at the origin of a cell.
    pub fn pointer(&self, column: u16, row: u16) -> Position {
        Position::new(
            f64::from(column) * self.cell_width,
            f64::from(row) * self.cell_height,
        )
    }

    /// Logical pixels covered by `columns` x `rows` cells.
    pub fn cells_to_size(&self, columns: u16, rows: u16) -> Size {
        Size::new(
            f64::from(columns) * self.cell_width,
            f64::from(rows) * self.cell_height,
        )
    }

    /// Logical origin and size of a cell rect.
    pub fn rect_to_logical(&self, rect: Rect) -> (Position, Size) {
        (
            self.pointer(rect.x, rect.y),
            self.cells_to_size(rect.width, rect.height),
        )
    }

    /// Cell rect covering a logical rectangle. The origin may be negative for
    /// windows dragged partly off screen; the extent is at least one cell.
    ///
    /// The origin is kept far enough from the `i32` limits that adding the
    /// extent cannot overflow.
    pub fn logical_to_cells(&self, position: Position, size: Size) -> FloatRect {
        let limit = f64::from(i32::MAX - i32::from(u16::MAX));
        let x = (position.x / self.cell_width).floor();
        let y = (position.y / self.cell_height).floor();
        let width = (size.width / self.cell_width).ceil();
        let height = (size.height / self.cell_height).ceil();
        FloatRect {
            x: x.clamp(-limit, limit) as i32,
            y: y.clamp(-limit, limit) as i32,
            width: width.clamp(1.0, f64::from(u16::MAX)) as u16,
            height: height.clamp(1.0, f64::from(u16::MAX)) as u16,
        }
    }
}

/// The visible part of a signed rect inside `bounds`, if any.
pub fn clip_rect(rect: FloatRect, bounds: Rect) -> Option<Rect> {
    let left = rect.x.max(i32::from(bounds.x));
    let top = rect.y.max(i32::from(bounds.y));
    let right = rect.x.saturating_add(i32::from(rect.width)).min(i32::from(bounds.right()));
    let bottom = rect.y.saturating_add(i32::from(rect.height)).min(i32::from(bounds.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect {
        x: left as u16,
        y: top as u16,
        width: (right - left) as u16,
        height: (bottom - top) as u16,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_cell_origin() {
        let metrics = CellMetrics::default();
        assert_eq!(metrics.pointer(3, 2), Position::new(24.0, 32.0));
    }

    #[test]
    fn logical_rect_floors_origin_and_ceils_extent() {
        let metrics = CellMetrics::default();
        let rect = metrics.logical_to_cells(Position::new(-10.0, 20.0), Size::new(401.0, 300.0));
        assert_eq!(
            rect,
            FloatRect {
                x: -2,
                y: 1,
                width: 51,
                height: 19
            }
        );
    }

    #[test]
    fn clip_drops_offscreen_parts() {
        let bounds = Rect::new(0, 0, 80, 24);
        let rect = FloatRect {
            x: -5,
            y: 20,
            width: 10,
            height: 10,
        };
        assert_eq!(clip_rect(rect, bounds), Some(Rect::new(0, 20, 5, 4)));
        let gone = FloatRect {
            x: 90,
            y: 0,
            width: 4,
            height: 4,
        };
        assert_eq!(clip_rect(gone, bounds), None);
    }

    #[test]
    fn far_away_windows_do_not_overflow() {
        let metrics = CellMetrics::default();
        let bounds = Rect::new(0, 0, 80, 24);
        let rect = metrics.logical_to_cells(Position::new(1e18, -1e18), Size::new(1e9, 1e9));
        assert!(rect.x.checked_add(i32::from(rect.width)).is_some());
        assert_eq!(clip_rect(rect, bounds), None);
        let edge = FloatRect {
            x: i32::MAX - 2,
            y: 0,
            width: 40,
            height: 4,
        };
        assert_eq!(clip_rect(edge, bounds), None);
    }
}
