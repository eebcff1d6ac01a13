//! Pure geometry helpers shared by the gesture controllers and the registry.
//!
//! Everything here works in logical pixels (`f64`). Nothing in this module
//! holds state, so every function is safe to call from anywhere.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use thiserror::Error;

/// Top-left corner of a window, or a pointer location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bound `value` to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: when `min > max` the minimum wins,
/// which keeps a window at least as large as its declared minimum.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Edge or corner a resize gesture is grabbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeDirection {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::Top,
        ResizeDirection::Bottom,
        ResizeDirection::Left,
        ResizeDirection::Right,
        ResizeDirection::TopLeft,
        ResizeDirection::TopRight,
        ResizeDirection::BottomLeft,
        ResizeDirection::BottomRight,
    ];

    /// The left edge follows the pointer; the right edge is the anchor.
    pub fn moves_left_edge(self) -> bool {
        matches!(
            self,
            ResizeDirection::Left | ResizeDirection::TopLeft | ResizeDirection::BottomLeft
        )
    }

    pub fn moves_right_edge(self) -> bool {
        matches!(
            self,
            ResizeDirection::Right | ResizeDirection::TopRight | ResizeDirection::BottomRight
        )
    }

    /// The top edge follows the pointer; the bottom edge is the anchor.
    pub fn moves_top_edge(self) -> bool {
        matches!(
            self,
            ResizeDirection::Top | ResizeDirection::TopLeft | ResizeDirection::TopRight
        )
    }

    pub fn moves_bottom_edge(self) -> bool {
        matches!(
            self,
            ResizeDirection::Bottom | ResizeDirection::BottomLeft | ResizeDirection::BottomRight
        )
    }

    /// Whether resizing in this direction also shifts the window origin.
    pub fn moves_origin(self) -> bool {
        self.moves_left_edge() || self.moves_top_edge()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeDirection::Top => "top",
            ResizeDirection::Bottom => "bottom",
            ResizeDirection::Left => "left",
            ResizeDirection::Right => "right",
            ResizeDirection::TopLeft => "top-left",
            ResizeDirection::TopRight => "top-right",
            ResizeDirection::BottomLeft => "bottom-left",
            ResizeDirection::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resize direction `{0}`")]
pub struct ParseDirectionError(pub String);

impl FromStr for ResizeDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeDirection::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// Outcome of one resize computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDelta {
    pub new_width: f64,
    pub new_height: f64,
    pub position_delta_x: f64,
    pub position_delta_y: f64,
}

impl ResizeDelta {
    pub fn size(&self) -> Size {
        Size::new(self.new_width, self.new_height)
    }

    pub fn position_delta(&self) -> Position {
        Position::new(self.position_delta_x, self.position_delta_y)
    }
}

/// Compute the size (and, for left/top edges, the origin shift) produced by
/// dragging `direction` by `pointer_delta` from a window of `origin_size`.
///
/// The anchored edge never moves: when `min_size`/`max_size` saturate the
/// size, the origin shift is taken from the clamped size instead of the raw
/// pointer travel.
pub fn compute_delta(
    direction: ResizeDirection,
    pointer_delta: Position,
    min_size: Size,
    max_size: Size,
    origin_size: Size,
) -> ResizeDelta {
    let mut width = origin_size.width;
    let mut height = origin_size.height;
    let mut position_delta_x = 0.0;
    let mut position_delta_y = 0.0;

    if direction.moves_left_edge() {
        width = origin_size.width - pointer_delta.x;
        position_delta_x = pointer_delta.x;
    } else if direction.moves_right_edge() {
        width = origin_size.width + pointer_delta.x;
    }

    if direction.moves_top_edge() {
        height = origin_size.height - pointer_delta.y;
        position_delta_y = pointer_delta.y;
    } else if direction.moves_bottom_edge() {
        height = origin_size.height + pointer_delta.y;
    }

    let new_width = clamp(width, min_size.width, max_size.width);
    let new_height = clamp(height, min_size.height, max_size.height);

    if direction.moves_left_edge() && new_width != width {
        position_delta_x = origin_size.width - new_width;
    }
    if direction.moves_top_edge() && new_height != height {
        position_delta_y = origin_size.height - new_height;
    }

    ResizeDelta {
        new_width,
        new_height,
        position_delta_x,
        position_delta_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Size = Size::new(200.0, 150.0);
    const MAX: Size = Size::new(2000.0, 1500.0);

    #[test]
    fn clamp_bounds_value() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        // inverted bounds: minimum wins
        assert_eq!(clamp(5.0, 20.0, 10.0), 20.0);
    }

    #[test]
    fn left_resize_keeps_right_edge_fixed() {
        let delta = compute_delta(
            ResizeDirection::Left,
            Position::new(-50.0, 0.0),
            MIN,
            MAX,
            Size::new(400.0, 300.0),
        );
        assert_eq!(delta.size(), Size::new(450.0, 300.0));
        assert_eq!(delta.position_delta(), Position::new(-50.0, 0.0));
        let x = 100.0 + delta.position_delta_x;
        assert_eq!(x, 50.0);
        assert_eq!(x + delta.new_width, 500.0);
    }

    #[test]
    fn bottom_right_never_moves_origin() {
        let delta = compute_delta(
            ResizeDirection::BottomRight,
            Position::new(30.0, -20.0),
            MIN,
            MAX,
            Size::new(400.0, 300.0),
        );
        assert_eq!(delta.size(), Size::new(430.0, 280.0));
        assert!(delta.position_delta().is_zero());
    }

    #[test]
    fn right_and_bottom_ignore_the_other_axis() {
        let origin = Size::new(400.0, 300.0);
        let right = compute_delta(
            ResizeDirection::Right,
            Position::new(10.0, 99.0),
            MIN,
            MAX,
            origin,
        );
        assert_eq!(right.size(), Size::new(410.0, 300.0));
        let bottom = compute_delta(
            ResizeDirection::Bottom,
            Position::new(99.0, 10.0),
            MIN,
            MAX,
            origin,
        );
        assert_eq!(bottom.size(), Size::new(400.0, 310.0));
        assert!(right.position_delta().is_zero() && bottom.position_delta().is_zero());
    }

    #[test]
    fn saturated_top_left_resize_keeps_anchor_corner() {
        let origin = Size::new(400.0, 300.0);
        // Shrink far past the minimum.
        let delta = compute_delta(
            ResizeDirection::TopLeft,
            Position::new(350.0, 250.0),
            MIN,
            MAX,
            origin,
        );
        assert_eq!(delta.size(), MIN);
        assert_eq!(delta.position_delta_x + delta.new_width, origin.width);
        assert_eq!(delta.position_delta_y + delta.new_height, origin.height);
    }

    #[test]
    fn saturated_growth_past_max_keeps_anchor() {
        let origin = Size::new(1900.0, 1400.0);
        let delta = compute_delta(
            ResizeDirection::Top,
            Position::new(0.0, -400.0),
            MIN,
            MAX,
            origin,
        );
        assert_eq!(delta.new_height, 1500.0);
        assert_eq!(delta.position_delta_y, -100.0);
        assert_eq!(delta.position_delta_x, 0.0);
    }

    #[test]
    fn top_right_moves_only_vertical_origin() {
        let delta = compute_delta(
            ResizeDirection::TopRight,
            Position::new(20.0, -10.0),
            MIN,
            MAX,
            Size::new(400.0, 300.0),
        );
        assert_eq!(delta.size(), Size::new(420.0, 310.0));
        assert_eq!(delta.position_delta(), Position::new(0.0, -10.0));
    }

    #[test]
    fn direction_tags_parse_and_print() {
        for direction in ResizeDirection::ALL {
            assert_eq!(direction.as_str().parse::<ResizeDirection>(), Ok(direction));
        }
        assert!("diagonal".parse::<ResizeDirection>().is_err());
        assert_eq!(ResizeDirection::default(), ResizeDirection::BottomRight);
    }
}
