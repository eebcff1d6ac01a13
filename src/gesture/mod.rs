//! Pointer gestures: drag-to-move and edge-resize.
//!
//! Controllers are plain state machines. They are fed explicit
//! [`PointerDown`] parameter objects and pointer positions, emit events
//! describing the gesture, and never touch the window registry themselves.

pub mod capture;
pub mod drag;
pub mod resize;

use crossterm::event::MouseButton;

use crate::geometry::Position;

pub use capture::{CaptureGuard, PointerCapture};
pub use drag::{DragBounds, DragController, DragEvent};
pub use resize::{ResizeController, ResizeEvent, ResizeUpdate};

/// The press that may start a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub pointer: Position,
    pub button: MouseButton,
}

impl PointerDown {
    pub fn new(pointer: Position, button: MouseButton) -> Self {
        Self { pointer, button }
    }

    pub fn primary(pointer: Position) -> Self {
        Self::new(pointer, MouseButton::Left)
    }

    pub fn is_primary(&self) -> bool {
        self.button == MouseButton::Left
    }
}
