//! Logging initialization: sets up the `tracing` subscriber and color
//! control from the CLI's global verbosity flags.

use anyhow::Result;
use colored::control as color_control;
use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Initialize the tracing subscriber based on `--verbose`/`--quiet`/`--debug`.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose || cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var("NO_COLOR").is_ok();
    let is_tty = std::io::stderr().is_terminal();
    if env_no_color || !is_tty {
        color_control::set_override(false);
    }

    Ok(())
}
