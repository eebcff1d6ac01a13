//! Drag-to-move controller.

use crate::geometry::Position;
use crate::gesture::PointerDown;
use crate::gesture::capture::{CaptureGuard, PointerCapture};

/// Optional per-side limits for the dragged origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragBounds {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

impl DragBounds {
    pub fn apply(&self, mut position: Position) -> Position {
        if let Some(right) = self.right {
            position.x = position.x.min(right);
        }
        if let Some(left) = self.left {
            position.x = position.x.max(left);
        }
        if let Some(bottom) = self.bottom {
            position.y = position.y.min(bottom);
        }
        if let Some(top) = self.top {
            position.y = position.y.max(top);
        }
        position
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Started(Position),
    Moved(Position),
    Ended(Position),
}

#[derive(Debug)]
struct ActiveDrag {
    start_pointer: Position,
    start_position: Position,
    _guard: CaptureGuard,
}

#[derive(Debug)]
pub struct DragController {
    position: Position,
    bounds: DragBounds,
    disabled: bool,
    capture: PointerCapture,
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new(initial: Position, capture: PointerCapture) -> Self {
        Self {
            position: initial,
            bounds: DragBounds::default(),
            disabled: false,
            capture,
            active: None,
        }
    }

    pub fn with_bounds(mut self, bounds: DragBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn set_bounds(&mut self, bounds: DragBounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> DragBounds {
        self.bounds
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Adopt an externally committed position. Ignored mid-gesture.
    pub fn set_position(&mut self, position: Position) {
        if self.active.is_none() {
            self.position = position;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns `true` when disabling cancelled a gesture in flight.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        self.disabled = disabled;
        if disabled && self.active.take().is_some() {
            tracing::debug!("drag cancelled by disable");
            return true;
        }
        false
    }

    pub fn begin(&mut self, down: PointerDown) -> Option<DragEvent> {
        if self.disabled || !down.is_primary() {
            return None;
        }
        // A missed release leaves a stale gesture behind; the new one replaces it.
        self.active = Some(ActiveDrag {
            start_pointer: down.pointer,
            start_position: self.position,
            _guard: self.capture.acquire(),
        });
        tracing::debug!(x = self.position.x, y = self.position.y, "drag started");
        Some(DragEvent::Started(self.position))
    }

    pub fn update(&mut self, pointer: Position) -> Option<DragEvent> {
        if self.disabled {
            return None;
        }
        let active = self.active.as_ref()?;
        let next = active.start_position + (pointer - active.start_pointer);
        self.position = self.bounds.apply(next);
        tracing::trace!(x = self.position.x, y = self.position.y, "drag moved");
        Some(DragEvent::Moved(self.position))
    }

    pub fn end(&mut self) -> Option<DragEvent> {
        if self.disabled {
            return None;
        }
        self.active.take()?;
        tracing::debug!(x = self.position.x, y = self.position.y, "drag ended");
        Some(DragEvent::Ended(self.position))
    }
}
