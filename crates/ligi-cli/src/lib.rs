//! `ligi` CLI - maintains a tag-based knowledge graph over a tree of
//! Markdown notes.
//!
//! All command implementations live in [`commands`]; this module only
//! parses arguments, sets up logging, and dispatches.

use anyhow::Result;
use clap::Parser;

pub mod cli;
mod commands;
pub mod error;
mod utils;

use cli::{Cli, Commands};
use utils::logging::initialize_logging;

/// Execute the `ligi` CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if logging initialization or the dispatched command
/// fails. The error's exit code is recoverable via [`error::CliError`].
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    match &cli.command {
        Commands::Index(args) => commands::index::run(&cli, args),
        Commands::Query { command } => commands::query::run(&cli, command),
        Commands::Check(args) => commands::check::run(&cli, args),
    }
}
