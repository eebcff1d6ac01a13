//! Command-line surface and the validated runtime configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use crate::apps::AppId;
use crate::error::DeskError;
use crate::settings::{
    DockPosition, MAX_DOCK_SIZE, MIN_DOCK_SIZE, SettingsChange, SystemSettings, ThemeMode,
};
use crate::storage::{STATE_FILE, Store};
use crate::viewport::CellMetrics;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "term-desk",
    version = env!("CARGO_PKG_VERSION"),
    about = "A desktop environment in the terminal: draggable windows, a dock and a menu bar"
)]
pub struct Cli {
    /// App to open at startup. Repeat to open several.
    #[arg(long = "open", value_name = "APP")]
    pub open: Vec<String>,

    /// Screen edge the dock sits on. Overrides the saved setting.
    #[arg(long = "dock", value_enum)]
    pub dock: Option<DockPosition>,

    /// Dock padding scale. Overrides the saved setting.
    #[arg(long = "dock-size", value_name = "N")]
    pub dock_size: Option<u8>,

    /// Hide the dock until the pointer touches its edge.
    #[arg(long = "autohide-dock")]
    pub autohide_dock: bool,

    /// Overrides the saved setting.
    #[arg(long = "theme", value_enum)]
    pub theme: Option<ThemeMode>,

    /// Directory holding saved settings and notes.
    #[arg(long = "data-dir", value_name = "PATH", conflicts_with = "ephemeral")]
    pub data_dir: Option<PathBuf>,

    /// Keep settings and notes in memory only.
    #[arg(long = "ephemeral")]
    pub ephemeral: bool,

    /// Logical pixels covered by one terminal cell.
    #[arg(long = "cell-size", value_name = "WxH", default_value = "8x16")]
    pub cell_size: String,

    /// Redraw rate.
    #[arg(long = "fps", value_name = "FPS", default_value_t = 60)]
    pub fps: u32,

    /// Write tracing output here. Without it, logs are discarded.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Start with mouse capture disabled.
    #[arg(long = "no-mouse")]
    pub no_mouse: bool,
}

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub open: Vec<AppId>,
    /// Settings given on the command line, applied over the saved ones.
    pub overrides: Vec<SettingsChange>,
    /// `None` keeps state in memory.
    pub state_path: Option<PathBuf>,
    pub metrics: CellMetrics,
    pub frame_budget: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
    pub mouse_capture: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            open: vec![AppId::Welcome],
            overrides: Vec::new(),
            state_path: None,
            metrics: CellMetrics::default(),
            frame_budget: Duration::from_secs_f64(1.0 / 60.0),
            log_file: None,
            log_level: Level::INFO,
            mouse_capture: true,
        }
    }
}

pub fn parse_cell_size(value: &str) -> Result<CellMetrics, DeskError> {
    let invalid = || DeskError::InvalidConfig(format!("cell size must look like 8x16, got {value:?}"));
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let cell_width = f64::from_str(w.trim()).map_err(|_| invalid())?;
    let cell_height = f64::from_str(h.trim()).map_err(|_| invalid())?;
    if !(cell_width.is_finite() && cell_height.is_finite() && cell_width > 0.0 && cell_height > 0.0) {
        return Err(invalid());
    }
    Ok(CellMetrics {
        cell_width,
        cell_height,
    })
}

impl DeskConfig {
    /// `base` with the command-line overrides applied.
    pub fn settings_over(&self, base: SystemSettings) -> SystemSettings {
        let mut settings = base.normalized();
        for change in &self.overrides {
            settings.apply(*change);
        }
        settings
    }

    /// Open the state store, or an in-memory one when there is no path.
    pub fn open_store(&self) -> Result<Store, DeskError> {
        match &self.state_path {
            Some(path) => Store::open(path),
            None => Ok(Store::in_memory()),
        }
    }
}

impl TryFrom<&Cli> for DeskConfig {
    type Error = DeskError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if let Some(size) = cli.dock_size
            && !(MIN_DOCK_SIZE..=MAX_DOCK_SIZE).contains(&size)
        {
            return Err(DeskError::InvalidConfig(format!(
                "dock size must be between {MIN_DOCK_SIZE} and {MAX_DOCK_SIZE}"
            )));
        }
        if !(1..=240).contains(&cli.fps) {
            return Err(DeskError::InvalidConfig(
                "fps must be between 1 and 240".to_string(),
            ));
        }
        let log_level = Level::from_str(&cli.log_level).map_err(|_| {
            DeskError::InvalidConfig(format!("unknown log level {:?}", cli.log_level))
        })?;
        let mut open = cli
            .open
            .iter()
            .map(|name| name.parse::<AppId>())
            .collect::<Result<Vec<_>, _>>()?;
        if open.is_empty() {
            open.push(AppId::Welcome);
        }

        let overrides: Vec<SettingsChange> = [
            cli.theme.map(SettingsChange::Theme),
            cli.dock.map(SettingsChange::DockPosition),
            cli.dock_size.map(SettingsChange::DockSize),
            cli.autohide_dock.then_some(SettingsChange::DockAutohide(true)),
        ]
        .into_iter()
        .flatten()
        .collect();
        let state_path = if cli.ephemeral {
            None
        } else {
            cli.data_dir
                .as_ref()
                .map(|dir| dir.join(STATE_FILE))
                .or_else(Store::default_path)
        };

        Ok(Self {
            open,
            overrides,
            state_path,
            metrics: parse_cell_size(&cli.cell_size)?,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(cli.fps)),
            log_file: cli.log_file.clone(),
            log_level,
            mouse_capture: !cli.no_mouse,
        })
    }
}
