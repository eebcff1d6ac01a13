//! Shared crate-wide constants.

use crate::geometry::Size;

/// Smallest size a resize gesture may produce, in logical pixels.
pub const DEFAULT_MIN_WINDOW_SIZE: Size = Size {
    width: 200.0,
    height: 150.0,
};

/// Largest size a resize gesture may produce, in logical pixels.
pub const DEFAULT_MAX_WINDOW_SIZE: Size = Size {
    width: 2000.0,
    height: 1500.0,
};

/// Logical pixels covered by one terminal column.
pub const DEFAULT_CELL_WIDTH: f64 = 8.0;

/// Logical pixels covered by one terminal row.
pub const DEFAULT_CELL_HEIGHT: f64 = 16.0;

/// Two presses on the same title bar within this window toggle maximize.
pub const DOUBLE_CLICK_MS: u64 = 500;

/// Minimum number of cells a window must keep inside the screen horizontally
/// so the user can grab its chrome again.
pub const MIN_VISIBLE_MARGIN_CELLS: u16 = 4;

/// Rows taken by the menu bar.
pub const MENU_BAR_HEIGHT: u16 = 1;

/// Rows (bottom dock) or columns (side dock) taken by the dock.
pub const DOCK_THICKNESS: u16 = 2;
