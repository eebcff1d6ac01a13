//! Shared component rendering context
//!
//! `ComponentContext` carries the UI state an app view may need while
//! rendering or handling events: whether its window is focused and a read-only
//! view of the system settings.

use crate::settings::SystemSettings;
use crate::theme::Palette;

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext<'a> {
    focused: bool,
    settings: &'a SystemSettings,
}

impl<'a> ComponentContext<'a> {
    pub const fn new(focused: bool, settings: &'a SystemSettings) -> Self {
        Self { focused, settings }
    }

    /// Returns whether the component's window is focused.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn settings(&self) -> &'a SystemSettings {
        self.settings
    }

    /// Palette for the active theme mode.
    pub fn palette(&self) -> &'static Palette {
        Palette::for_mode(self.settings.theme)
    }

    /// Return a new `ComponentContext` with a modified `focused` flag.
    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}
