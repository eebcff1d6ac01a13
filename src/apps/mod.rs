//! The app catalog: a static table describing every launchable app.
//!
//! Adding an app means adding a descriptor; nothing else in the desktop
//! switches on the app id.

pub mod calculator;
pub mod calendar;
pub mod finder;
pub mod notes;
pub mod placeholder;
pub mod safari;
pub mod settings_app;
pub mod welcome;

use std::fmt;
use std::str::FromStr;

use crate::components::Component;
use crate::error::DeskError;
use crate::geometry::{Position, Size};
use crate::menu_bar::{Menu, standard_menus};
use crate::storage::Store;
use crate::window::{WindowId, WindowSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AppId {
    Finder,
    Safari,
    Mail,
    Messages,
    Calendar,
    Notes,
    Calculator,
    Settings,
    Welcome,
}

impl AppId {
    pub const ALL: [AppId; 9] = [
        AppId::Finder,
        AppId::Safari,
        AppId::Mail,
        AppId::Messages,
        AppId::Calendar,
        AppId::Notes,
        AppId::Calculator,
        AppId::Settings,
        AppId::Welcome,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppId::Finder => "finder",
            AppId::Safari => "safari",
            AppId::Mail => "mail",
            AppId::Messages => "messages",
            AppId::Calendar => "calendar",
            AppId::Notes => "notes",
            AppId::Calculator => "calculator",
            AppId::Settings => "settings",
            AppId::Welcome => "welcome",
        }
    }

    /// Apps are single-instance, so the app id doubles as the window id.
    pub fn window_id(self) -> WindowId {
        WindowId::new(self.as_str())
    }

    pub fn from_window_id(id: &WindowId) -> Option<AppId> {
        id.as_str().parse().ok()
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppId {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AppId::ALL
            .into_iter()
            .find(|app| app.as_str() == wanted)
            .ok_or_else(|| DeskError::UnknownApp(s.to_string()))
    }
}

#[derive(Clone, Copy)]
pub struct AppDescriptor {
    pub id: AppId,
    pub name: &'static str,
    pub icon: &'static str,
    pub position: Position,
    pub size: Size,
    pub in_dock: bool,
    pub menus: &'static [Menu],
    /// Builds the app's view. Apps that keep state load it from the store.
    pub factory: fn(&Store) -> Box<dyn Component>,
}

impl fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl AppDescriptor {
    /// Spec for a fresh window with the descriptor defaults.
    pub fn window_spec(&self) -> WindowSpec<AppId> {
        WindowSpec::new(self.id.window_id(), self.name, self.id)
            .at(self.position)
            .sized(self.size)
            .icon(self.icon)
    }
}

fn open_finder(_store: &Store) -> Box<dyn Component> {
    Box::new(finder::FinderApp::new())
}
fn open_safari(_store: &Store) -> Box<dyn Component> {
    Box::new(safari::SafariApp::new())
}
fn open_mail(_store: &Store) -> Box<dyn Component> {
    Box::new(placeholder::PlaceholderApp::new("Mail", "No new messages."))
}
fn open_messages(_store: &Store) -> Box<dyn Component> {
    Box::new(placeholder::PlaceholderApp::new(
        "Messages",
        "Sign in to start a conversation.",
    ))
}
fn open_calendar(_store: &Store) -> Box<dyn Component> {
    Box::new(calendar::CalendarApp::new())
}
fn open_notes(store: &Store) -> Box<dyn Component> {
    Box::new(notes::NotesApp::load(store.clone()))
}
fn open_calculator(_store: &Store) -> Box<dyn Component> {
    Box::new(calculator::CalculatorApp::new())
}
fn open_settings(_store: &Store) -> Box<dyn Component> {
    Box::new(settings_app::SettingsApp::new())
}
fn open_welcome(_store: &Store) -> Box<dyn Component> {
    Box::new(welcome::WelcomeApp::new())
}

const APP_REGISTRY: [AppDescriptor; 9] = [
    AppDescriptor {
        id: AppId::Finder,
        name: "Finder",
        icon: "◧",
        position: Position::new(48.0, 48.0),
        size: Size::new(560.0, 320.0),
        in_dock: true,
        menus: standard_menus::FINDER,
        factory: open_finder,
    },
    AppDescriptor {
        id: AppId::Safari,
        name: "Safari",
        icon: "◎",
        position: Position::new(80.0, 64.0),
        size: Size::new(600.0, 320.0),
        in_dock: true,
        menus: standard_menus::BROWSER,
        factory: open_safari,
    },
    AppDescriptor {
        id: AppId::Mail,
        name: "Mail",
        icon: "✉",
        position: Position::new(112.0, 80.0),
        size: Size::new(400.0, 224.0),
        in_dock: true,
        menus: standard_menus::GENERIC,
        factory: open_mail,
    },
    AppDescriptor {
        id: AppId::Messages,
        name: "Messages",
        icon: "✆",
        position: Position::new(144.0, 96.0),
        size: Size::new(400.0, 224.0),
        in_dock: true,
        menus: standard_menus::GENERIC,
        factory: open_messages,
    },
    AppDescriptor {
        id: AppId::Calendar,
        name: "Calendar",
        icon: "▦",
        position: Position::new(176.0, 64.0),
        size: Size::new(240.0, 192.0),
        in_dock: true,
        menus: standard_menus::GENERIC,
        factory: open_calendar,
    },
    AppDescriptor {
        id: AppId::Notes,
        name: "Notes",
        icon: "✎",
        position: Position::new(96.0, 48.0),
        size: Size::new(480.0, 288.0),
        in_dock: true,
        menus: standard_menus::NOTES,
        factory: open_notes,
    },
    AppDescriptor {
        id: AppId::Calculator,
        name: "Calculator",
        icon: "±",
        position: Position::new(400.0, 80.0),
        size: Size::new(224.0, 208.0),
        in_dock: true,
        menus: standard_menus::GENERIC,
        factory: open_calculator,
    },
    AppDescriptor {
        id: AppId::Settings,
        name: "System Settings",
        icon: "⚙",
        position: Position::new(160.0, 64.0),
        size: Size::new(480.0, 288.0),
        in_dock: true,
        menus: standard_menus::GENERIC,
        factory: open_settings,
    },
    AppDescriptor {
        id: AppId::Welcome,
        name: "Welcome",
        icon: "★",
        position: Position::new(120.0, 48.0),
        size: Size::new(464.0, 256.0),
        in_dock: false,
        menus: standard_menus::GENERIC,
        factory: open_welcome,
    },
];

/// Lookup over the static descriptor table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppCatalog;

impl AppCatalog {
    pub fn descriptors(&self) -> &'static [AppDescriptor] {
        &APP_REGISTRY
    }

    pub fn get(&self, id: AppId) -> Option<&'static AppDescriptor> {
        APP_REGISTRY.iter().find(|descriptor| descriptor.id == id)
    }

    pub fn dock_apps(&self) -> impl Iterator<Item = &'static AppDescriptor> {
        APP_REGISTRY.iter().filter(|descriptor| descriptor.in_dock)
    }
}
