use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Window commands for the focused window
    CloseWindow,
    MinimizeWindow,
    ZoomWindow,
    CycleWindows,
    OpenSettings,
    Spotlight,
    ToggleMouseCapture,
    DismissMenu,
    // In-app navigation
    SelectPrev,
    SelectNext,
    SelectLeft,
    SelectRight,
    Activate,
    ToggleSelection,
    NavigateBack,
    GoBack,
    GoForward,
    NewItem,
    DeleteItem,
    RenameItem,
    // Scrolling
    ScrollPageUp,
    ScrollPageDown,
    ScrollHome,
    ScrollEnd,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::CloseWindow => "Close window",
            Action::MinimizeWindow => "Minimize window",
            Action::ZoomWindow => "Zoom window",
            Action::CycleWindows => "Cycle windows",
            Action::OpenSettings => "Open System Settings",
            Action::Spotlight => "Spotlight search",
            Action::ToggleMouseCapture => "Toggle mouse capture",
            Action::DismissMenu => "Close menu",
            Action::SelectPrev => "Previous item",
            Action::SelectNext => "Next item",
            Action::SelectLeft => "Move left",
            Action::SelectRight => "Move right",
            Action::Activate => "Open / activate",
            Action::ToggleSelection => "Toggle",
            Action::NavigateBack => "Back",
            Action::GoBack => "History back",
            Action::GoForward => "History forward",
            Action::NewItem => "New item",
            Action::DeleteItem => "Delete item",
            Action::RenameItem => "Rename item",
            Action::ScrollPageUp => "Page up",
            Action::ScrollPageDown => "Page down",
            Action::ScrollHome => "First item",
            Action::ScrollEnd => "Last item",
        };
        write!(f, "{}", s)
    }
}

impl Action {
    /// Actions the desktop handles before the focused app sees the key.
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Action::Quit
                | Action::CloseWindow
                | Action::MinimizeWindow
                | Action::ZoomWindow
                | Action::CycleWindows
                | Action::OpenSettings
                | Action::Spotlight
                | Action::ToggleMouseCapture
        )
    }
}
