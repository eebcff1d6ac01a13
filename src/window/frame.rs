//! Per-window owner of the drag and resize controllers.
//!
//! The frame is the only place where gesture output turns into registry
//! commands: drag updates become `move_window`, resize updates become
//! `resize` plus, for left/top edges, `move_window` relative to where the
//! window was when the gesture started.

use crate::geometry::{Position, ResizeDirection};
use crate::gesture::{
    DragBounds, DragController, DragEvent, PointerCapture, PointerDown, ResizeController,
    ResizeEvent,
};
use crate::window::registry::{WindowId, WindowRecord, WindowRegistry};

#[derive(Debug)]
pub struct WindowFrame {
    id: WindowId,
    drag: DragController,
    resize: ResizeController,
    resize_origin: Position,
}

impl WindowFrame {
    pub fn new<C>(record: &WindowRecord<C>, capture: &PointerCapture) -> Self {
        let mut frame = Self {
            id: record.id.clone(),
            drag: DragController::new(record.position, capture.clone()),
            resize: ResizeController::new(record.size, capture.clone()),
            resize_origin: record.position,
        };
        frame.sync(record);
        frame
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_dragging() || self.resize.is_resizing()
    }

    pub fn resize_direction(&self) -> Option<ResizeDirection> {
        self.resize.direction()
    }

    pub fn drag_bounds(&self) -> DragBounds {
        self.drag.bounds()
    }

    pub fn set_drag_bounds(&mut self, bounds: DragBounds) {
        self.drag.set_bounds(bounds);
    }

    /// Mirror the committed record into the controllers. Maximized windows
    /// disable both controllers, which cancels a gesture in flight; returns
    /// `true` when that happened.
    pub fn sync<C>(&mut self, record: &WindowRecord<C>) -> bool {
        let cancelled_drag = self.drag.set_disabled(record.is_maximized);
        let cancelled_resize = self.resize.set_disabled(record.is_maximized);
        self.drag.set_position(record.position);
        self.resize.set_size(record.size);
        cancelled_drag || cancelled_resize
    }

    /// Start dragging from the title bar.
    pub fn begin_drag(&mut self, down: PointerDown) -> bool {
        matches!(self.drag.begin(down), Some(DragEvent::Started(_)))
    }

    pub fn begin_resize(&mut self, down: PointerDown, direction: ResizeDirection) -> bool {
        self.resize_origin = self.drag.position();
        matches!(
            self.resize.begin(down, direction),
            Some(ResizeEvent::Started(_))
        )
    }

    pub fn pointer_moved<C>(&mut self, pointer: Position, registry: &mut WindowRegistry<C>) -> bool {
        if self.drag.is_dragging() {
            if let Some(DragEvent::Moved(position)) = self.drag.update(pointer) {
                registry.move_window(&self.id, position);
                return true;
            }
            return false;
        }
        if let Some(ResizeEvent::Resized(update)) = self.resize.update(pointer) {
            registry.resize(&self.id, update.size);
            if self.resize.direction().is_some_and(ResizeDirection::moves_origin) {
                let position = self.resize_origin + update.position_delta.unwrap_or(Position::ZERO);
                registry.move_window(&self.id, position);
                self.drag.set_position(position);
            }
            return true;
        }
        false
    }

    pub fn pointer_released<C>(&mut self, registry: &mut WindowRegistry<C>) -> bool {
        if let Some(DragEvent::Ended(position)) = self.drag.end() {
            registry.move_window(&self.id, position);
            return true;
        }
        if let Some(ResizeEvent::Ended(size)) = self.resize.end() {
            registry.resize(&self.id, size);
            return true;
        }
        false
    }

    /// Abandon any gesture without committing further geometry.
    pub fn cancel(&mut self) {
        let drag_disabled = self.drag.is_disabled();
        let resize_disabled = self.resize.is_disabled();
        self.drag.set_disabled(true);
        self.resize.set_disabled(true);
        self.drag.set_disabled(drag_disabled);
        self.resize.set_disabled(resize_disabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::window::registry::WindowSpec;

    fn setup() -> (WindowRegistry<()>, WindowFrame, PointerCapture) {
        let mut registry = WindowRegistry::new();
        registry.open(
            WindowSpec::new("notes", "Notes", ())
                .at(Position::new(100.0, 100.0))
                .sized(Size::new(400.0, 300.0)),
        );
        let capture = PointerCapture::new();
        let frame = WindowFrame::new(registry.get("notes").unwrap(), &capture);
        (registry, frame, capture)
    }

    #[test]
    fn left_resize_keeps_right_edge_in_registry() {
        let (mut registry, mut frame, _) = setup();
        frame.begin_resize(
            PointerDown::primary(Position::new(100.0, 200.0)),
            ResizeDirection::Left,
        );
        frame.pointer_moved(Position::new(80.0, 200.0), &mut registry);
        frame.pointer_moved(Position::new(50.0, 200.0), &mut registry);
        frame.pointer_released(&mut registry);
        let record = registry.get("notes").unwrap();
        assert_eq!(record.size, Size::new(450.0, 300.0));
        assert_eq!(record.position, Position::new(50.0, 100.0));
        assert_eq!(record.position.x + record.size.width, 500.0);
    }

    #[test]
    fn drag_commits_positions_without_drift() {
        let (mut registry, mut frame, capture) = setup();
        frame.begin_drag(PointerDown::primary(Position::new(10.0, 10.0)));
        frame.pointer_moved(Position::new(20.0, 10.0), &mut registry);
        assert_eq!(registry.get("notes").unwrap().position, Position::new(110.0, 100.0));
        frame.pointer_moved(Position::new(15.0, 10.0), &mut registry);
        assert_eq!(registry.get("notes").unwrap().position, Position::new(105.0, 100.0));
        assert!(frame.pointer_released(&mut registry));
        assert_eq!(capture.active(), 0);
    }

    #[test]
    fn maximizing_mid_drag_cancels_gesture() {
        let (mut registry, mut frame, capture) = setup();
        frame.begin_drag(PointerDown::primary(Position::ZERO));
        registry.maximize("notes");
        assert!(frame.sync(registry.get("notes").unwrap()));
        assert_eq!(capture.active(), 0);
        assert!(!frame.pointer_moved(Position::new(50.0, 50.0), &mut registry));
        assert!(!frame.begin_drag(PointerDown::primary(Position::ZERO)));
    }

    #[test]
    fn cancel_releases_capture_and_keeps_enabled() {
        let (mut registry, mut frame, capture) = setup();
        frame.begin_resize(PointerDown::primary(Position::ZERO), ResizeDirection::Bottom);
        frame.cancel();
        assert_eq!(capture.active(), 0);
        assert!(!frame.pointer_moved(Position::new(0.0, 40.0), &mut registry));
        assert!(frame.begin_drag(PointerDown::primary(Position::ZERO)));
    }
}
