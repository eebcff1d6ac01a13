use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::apps::AppId;
use crate::settings::SettingsChange;
use crate::ui::UiFrame;

pub use crate::component_context::ComponentContext;

/// Something an app asks the desktop to do on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRequest {
    Launch(AppId),
    Settings(SettingsChange),
    CloseWindow,
}

/// A view hosted inside a window.
///
/// Mouse events arrive localized to the content area: column and row are
/// relative to the top-left content cell.
pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext<'_>) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        false
    }

    /// Window title override, polled after each handled event.
    fn title(&self) -> Option<String> {
        None
    }

    /// Drain requests raised since the last call.
    fn take_requests(&mut self) -> Vec<AppRequest> {
        Vec::new()
    }
}
