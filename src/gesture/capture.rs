//! Bookkeeping for the pointer listeners a gesture holds while it is active.
//!
//! Starting a gesture acquires a [`CaptureGuard`]; the guard releases its
//! slot when dropped, so every exit path (release, cancel, restart, or the
//! controller going away) tears the capture down.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    active: Rc<Cell<usize>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> CaptureGuard {
        self.active.set(self.active.get() + 1);
        CaptureGuard {
            active: Rc::clone(&self.active),
        }
    }

    /// Number of live guards.
    pub fn active(&self) -> usize {
        self.active.get()
    }

    pub fn is_captured(&self) -> bool {
        self.active() > 0
    }
}

#[derive(Debug)]
pub struct CaptureGuard {
    active: Rc<Cell<usize>>,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
    }
}
