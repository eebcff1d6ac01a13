//! Shared system settings, owned by the desktop and read on every render.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const MIN_DOCK_SIZE: u8 = 1;
pub const MAX_DOCK_SIZE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockPosition {
    #[default]
    Bottom,
    Left,
    Right,
}

impl DockPosition {
    pub const ALL: [DockPosition; 3] = [DockPosition::Bottom, DockPosition::Left, DockPosition::Right];

    pub fn label(self) -> &'static str {
        match self {
            DockPosition::Bottom => "Bottom",
            DockPosition::Left => "Left",
            DockPosition::Right => "Right",
        }
    }
}

/// Desktop background pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wallpaper {
    #[default]
    Plain,
    Dots,
    Stripes,
    Grid,
}

impl Wallpaper {
    pub const ALL: [Wallpaper; 4] = [
        Wallpaper::Plain,
        Wallpaper::Dots,
        Wallpaper::Stripes,
        Wallpaper::Grid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Wallpaper::Plain => "Plain",
            Wallpaper::Dots => "Dots",
            Wallpaper::Stripes => "Stripes",
            Wallpaper::Grid => "Grid",
        }
    }

    /// Glyph drawn at `(x, y)`, if any.
    pub fn glyph(self, x: u16, y: u16) -> Option<&'static str> {
        match self {
            Wallpaper::Plain => None,
            Wallpaper::Dots => (x % 4 == 0 && y % 2 == 0).then_some("·"),
            Wallpaper::Stripes => ((x + y) % 6 == 0).then_some("╱"),
            Wallpaper::Grid => match (x % 8 == 0, y % 4 == 0) {
                (true, true) => Some("┼"),
                (true, false) => Some("│"),
                (false, true) => Some("─"),
                (false, false) => None,
            },
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockSettings {
    /// Padding scale, `MIN_DOCK_SIZE..=MAX_DOCK_SIZE`.
    pub size: u8,
    pub position: DockPosition,
    pub autohide: bool,
    /// Enlarge the hovered icon.
    pub magnification: bool,
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            size: 2,
            position: DockPosition::Bottom,
            autohide: false,
            magnification: true,
        }
    }
}

/// Persisted under the `systemSettings` key; missing fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemSettings {
    pub theme: ThemeMode,
    pub wallpaper: Wallpaper,
    pub dock: DockSettings,
    pub show_clock: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            wallpaper: Wallpaper::Plain,
            dock: DockSettings::default(),
            show_clock: true,
        }
    }
}

/// A single mutation requested by the Settings app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    Theme(ThemeMode),
    Wallpaper(Wallpaper),
    DockSize(u8),
    DockPosition(DockPosition),
    DockAutohide(bool),
    DockMagnification(bool),
    ShowClock(bool),
    Reset,
}

impl SystemSettings {
    pub fn apply(&mut self, change: SettingsChange) {
        tracing::debug!(?change, "settings changed");
        match change {
            SettingsChange::Theme(theme) => self.theme = theme,
            SettingsChange::Wallpaper(wallpaper) => self.wallpaper = wallpaper,
            SettingsChange::DockSize(size) => {
                self.dock.size = size.clamp(MIN_DOCK_SIZE, MAX_DOCK_SIZE);
            }
            SettingsChange::DockPosition(position) => self.dock.position = position,
            SettingsChange::DockAutohide(autohide) => self.dock.autohide = autohide,
            SettingsChange::DockMagnification(enabled) => self.dock.magnification = enabled,
            SettingsChange::ShowClock(show) => self.show_clock = show,
            SettingsChange::Reset => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Pull hand-edited or stale values back into range.
    pub fn normalized(mut self) -> Self {
        self.dock.size = self.dock.size.clamp(MIN_DOCK_SIZE, MAX_DOCK_SIZE);
        self
    }
}
