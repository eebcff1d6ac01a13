pub mod decorator;
pub mod frame;
pub mod registry;

pub use frame::WindowFrame;
pub use registry::{
    InvariantViolation, RegistryEvent, WindowId, WindowRecord, WindowRegistry, WindowSpec,
};

/// Signed cell rectangle origin with unsigned size.
///
/// Windows may hang off the left or top of the screen, so their cell origin
/// can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn from_rect(rect: ratatui::prelude::Rect) -> Self {
        Self {
            x: i32::from(rect.x),
            y: i32::from(rect.y),
            width: rect.width,
            height: rect.height,
        }
    }
}
