use clap::Parser;
use ratatui::prelude::Rect;

use term_desk::config::{Cli, DeskConfig};
use term_desk::desktop::Desktop;
use term_desk::drivers::console::{ConsoleDriver, ConsoleSession};
use term_desk::error::DeskError;
use term_desk::runner::run_desktop;
use term_desk::tracing_sub;

fn main() -> Result<(), DeskError> {
    let cli = Cli::parse();
    let config = DeskConfig::try_from(&cli)?;
    tracing_sub::init(config.log_level, config.log_file.as_deref())?;
    tracing::info!(
        apps = ?config.open,
        state = ?config.state_path,
        "starting term-desk"
    );
    let store = config.open_store()?;

    let mut session = ConsoleSession::new()?;
    session.enter()?;
    let size = session.terminal_mut().size()?;
    let mut desktop = Desktop::from_config(Rect::new(0, 0, size.width, size.height), &config, store);
    let mut driver = ConsoleDriver::new();

    let result = run_desktop(
        session.terminal_mut(),
        &mut driver,
        &mut desktop,
        config.frame_budget,
    );
    session.exit()?;
    tracing::info!(windows = desktop.registry().len(), "term-desk exited");
    result
}
