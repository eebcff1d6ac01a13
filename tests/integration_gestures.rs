use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use term_desk::apps::AppId;
use term_desk::desktop::Desktop;
use term_desk::geometry::{Position, ResizeDirection, Size};
use term_desk::gesture::{PointerCapture, PointerDown};
use term_desk::settings::SystemSettings;
use term_desk::viewport::CellMetrics;
use term_desk::window::{WindowFrame, WindowRegistry, WindowSpec};

fn setup() -> (WindowRegistry<()>, WindowFrame, PointerCapture) {
    let mut registry = WindowRegistry::new();
    registry.open(
        WindowSpec::new("w", "W", ())
            .at(Position::new(100.0, 100.0))
            .sized(Size::new(400.0, 300.0)),
    );
    let capture = PointerCapture::new();
    let frame = WindowFrame::new(registry.get("w").unwrap(), &capture);
    (registry, frame, capture)
}

#[test]
fn left_edge_resize_keeps_the_right_edge_anchored() {
    let (mut registry, mut frame, capture) = setup();
    assert!(frame.begin_resize(
        PointerDown::primary(Position::new(100.0, 200.0)),
        ResizeDirection::Left
    ));
    frame.pointer_moved(Position::new(50.0, 200.0), &mut registry);
    frame.pointer_released(&mut registry);

    let window = registry.get("w").unwrap();
    assert_eq!(window.size, Size::new(450.0, 300.0));
    assert_eq!(window.position, Position::new(50.0, 100.0));
    assert_eq!(window.position.x + window.size.width, 500.0);
    assert_eq!(capture.active(), 0);
}

#[test]
fn clamped_top_left_resize_stops_at_the_minimum() {
    let (mut registry, mut frame, _capture) = setup();
    frame.begin_resize(
        PointerDown::primary(Position::new(100.0, 100.0)),
        ResizeDirection::TopLeft,
    );
    frame.pointer_moved(Position::new(600.0, 500.0), &mut registry);
    frame.pointer_released(&mut registry);

    let window = registry.get("w").unwrap();
    assert_eq!(window.size, Size::new(200.0, 150.0));
    assert_eq!(window.position, Position::new(300.0, 250.0));
    assert_eq!(window.position.x + window.size.width, 500.0);
    assert_eq!(window.position.y + window.size.height, 400.0);
}

#[test]
fn maximizing_mid_drag_cancels_the_gesture() {
    let (mut registry, mut frame, capture) = setup();
    frame.begin_drag(PointerDown::primary(Position::ZERO));
    assert_eq!(capture.active(), 1);
    registry.maximize("w");
    assert!(frame.sync(registry.get("w").unwrap()));
    assert!(!frame.is_active());
    assert_eq!(capture.active(), 0);
    assert!(!frame.begin_drag(PointerDown::primary(Position::ZERO)));
}

#[test]
fn missed_release_is_replaced_by_the_next_press() {
    let (mut registry, mut frame, capture) = setup();
    frame.begin_drag(PointerDown::primary(Position::ZERO));
    frame.pointer_moved(Position::new(30.0, 0.0), &mut registry);
    frame.begin_drag(PointerDown::primary(Position::new(500.0, 500.0)));
    assert_eq!(capture.active(), 1);
    frame.pointer_moved(Position::new(510.0, 500.0), &mut registry);
    assert_eq!(registry.get("w").unwrap().position, Position::new(140.0, 100.0));
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn window_shrunk_to_a_small_screen_survives_a_still_resize() {
    let mut desktop = Desktop::new(
        Rect::new(0, 0, 40, 12),
        SystemSettings::default(),
        CellMetrics::default(),
    );
    assert!(desktop.launch(AppId::Safari));
    let id = AppId::Safari.window_id();
    let before = desktop.registry().get(&id).unwrap().size;
    assert!(before.height < 150.0);

    let outer = desktop.outer_rect(&id).unwrap();
    let column = outer.x as u16;
    let row = (outer.y + i32::from(outer.height) - 1) as u16;
    desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), column, row));
    assert!(desktop.is_gesture_active());
    desktop.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), column, row));
    desktop.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), column, row));

    assert!(!desktop.is_gesture_active());
    assert_eq!(desktop.registry().get(&id).unwrap().size, before);
}
