use std::io;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::desktop::Desktop;
use crate::drivers::InputDriver;
use crate::error::Result;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// Drive `desktop` until it asks to quit.
///
/// Each idle tick redraws the whole desktop; input events are dispatched as
/// they arrive. Mouse capture toggles requested by the desktop are forwarded
/// to the driver after every step.
pub fn run_desktop<B, D>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    desktop: &mut Desktop,
    frame_budget: Duration,
) -> Result<()>
where
    B: Backend,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, frame_budget);
    event_loop
        .driver()
        .set_mouse_capture(desktop.mouse_capture_enabled())?;

    event_loop.run(|driver, event| {
        match event {
            Some(event) => {
                desktop.handle_event(&event);
            }
            None => {
                terminal
                    .draw(|frame| {
                        let mut ui = UiFrame::new(frame);
                        desktop.render(&mut ui);
                    })
                    .map_err(|err| io::Error::other(err.to_string()))?;
            }
        }
        if let Some(enabled) = desktop.take_mouse_capture_change() {
            driver.set_mouse_capture(enabled)?;
        }
        if desktop.should_quit() {
            tracing::info!("quit requested");
            return Ok(ControlFlow::Quit);
        }
        Ok(ControlFlow::Continue)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::AppId;
    use crate::drivers::ScriptedDriver;
    use crate::settings::SystemSettings;
    use crate::viewport::CellMetrics;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::prelude::Rect;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn quits_on_ctrl_q_after_drawing() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut desktop = Desktop::new(
            Rect::new(0, 0, 80, 24),
            SystemSettings::default(),
            CellMetrics::default(),
        );
        desktop.launch(AppId::Calculator);
        let mut driver = ScriptedDriver::new([
            key(KeyCode::Char('c'), KeyModifiers::ALT),
            key(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ]);
        run_desktop(&mut terminal, &mut driver, &mut desktop, Duration::ZERO).unwrap();

        assert!(desktop.should_quit());
        assert_eq!(driver.remaining(), 0);
        assert_eq!(driver.capture_history(), &[true, false]);
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(1, 0)].symbol(), "≡");
    }
}
