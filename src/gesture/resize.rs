//! Edge/corner resize controller.

use crate::constants::{DEFAULT_MAX_WINDOW_SIZE, DEFAULT_MIN_WINDOW_SIZE};
use crate::geometry::{Position, ResizeDirection, Size, compute_delta};
use crate::gesture::PointerDown;
use crate::gesture::capture::{CaptureGuard, PointerCapture};

/// Result of one pointer move during a resize.
///
/// `position_delta` is relative to the window origin at gesture start and is
/// `None` when the origin does not move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeUpdate {
    pub size: Size,
    pub position_delta: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeEvent {
    Started(ResizeDirection),
    Resized(ResizeUpdate),
    Ended(Size),
}

#[derive(Debug)]
struct ActiveResize {
    direction: ResizeDirection,
    start_pointer: Position,
    start_size: Size,
    min_size: Size,
    max_size: Size,
    _guard: CaptureGuard,
}

#[derive(Debug)]
pub struct ResizeController {
    size: Size,
    min_size: Size,
    max_size: Size,
    disabled: bool,
    capture: PointerCapture,
    active: Option<ActiveResize>,
}

impl ResizeController {
    pub fn new(initial: Size, capture: PointerCapture) -> Self {
        Self {
            size: initial,
            min_size: DEFAULT_MIN_WINDOW_SIZE,
            max_size: DEFAULT_MAX_WINDOW_SIZE,
            disabled: false,
            capture,
            active: None,
        }
    }

    pub fn with_limits(mut self, min_size: Size, max_size: Size) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn max_size(&self) -> Size {
        self.max_size
    }

    /// Adopt an externally committed size. Ignored mid-gesture.
    pub fn set_size(&mut self, size: Size) {
        if self.active.is_none() {
            self.size = size;
        }
    }

    pub fn is_resizing(&self) -> bool {
        self.active.is_some()
    }

    pub fn direction(&self) -> Option<ResizeDirection> {
        self.active.as_ref().map(|active| active.direction)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns `true` when disabling cancelled a gesture in flight.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        self.disabled = disabled;
        if disabled && self.active.take().is_some() {
            tracing::debug!("resize cancelled by disable");
            return true;
        }
        false
    }

    pub fn begin(&mut self, down: PointerDown, direction: ResizeDirection) -> Option<ResizeEvent> {
        if self.disabled || !down.is_primary() {
            return None;
        }
        // A window placed outside the limits (e.g. shrunk to fit a small
        // screen) keeps its size until the pointer actually moves it.
        let start = self.size;
        self.active = Some(ActiveResize {
            direction,
            start_pointer: down.pointer,
            start_size: start,
            min_size: Size::new(
                self.min_size.width.min(start.width),
                self.min_size.height.min(start.height),
            ),
            max_size: Size::new(
                self.max_size.width.max(start.width),
                self.max_size.height.max(start.height),
            ),
            _guard: self.capture.acquire(),
        });
        tracing::debug!(%direction, width = self.size.width, height = self.size.height, "resize started");
        Some(ResizeEvent::Started(direction))
    }

    pub fn update(&mut self, pointer: Position) -> Option<ResizeEvent> {
        if self.disabled {
            return None;
        }
        let active = self.active.as_ref()?;
        let delta = compute_delta(
            active.direction,
            pointer - active.start_pointer,
            active.min_size,
            active.max_size,
            active.start_size,
        );
        self.size = delta.size();
        let position_delta = Some(delta.position_delta()).filter(|d| !d.is_zero());
        tracing::trace!(width = self.size.width, height = self.size.height, "resize moved");
        Some(ResizeEvent::Resized(ResizeUpdate {
            size: self.size,
            position_delta,
        }))
    }

    pub fn end(&mut self) -> Option<ResizeEvent> {
        if self.disabled {
            return None;
        }
        self.active.take()?;
        tracing::debug!(width = self.size.width, height = self.size.height, "resize ended");
        Some(ResizeEvent::Ended(self.size))
    }
}
