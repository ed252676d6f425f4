//! # CLI Structure and Argument Parsing
//!
//! The `ligi` command-line interface, built with `clap` derive macros. Three
//! subcommands cover the whole surface: `index` builds or refreshes the tag
//! index, `query` reads it, `check` reports (and optionally repairs) its
//! health.
//!
//! ```bash
//! ligi index
//! ligi query t proj & urgent
//! ligi query list
//! ligi check --prune
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI structure.
#[derive(Parser, Debug)]
#[command(name = "ligi")]
#[command(version)]
#[command(about = "A tag-based knowledge graph over a tree of Markdown notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose diagnostics on stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Show timing information after the command completes.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build or refresh the tag index
    Index(IndexArgs),
    /// Evaluate a tag expression, or list known tags
    Query {
        #[command(subcommand)]
        command: QueryCommands,
    },
    /// Report workspace health, optionally pruning broken entries
    Check(CheckArgs),
}

/// Arguments for `ligi index`.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Start the workspace search from this directory instead of the cwd.
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,
    /// Re-index only this single `art/`-relative file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,
    /// Merge this workspace's tags into the global index (or, run from the
    /// global workspace itself, rebuild the global index from every
    /// registered workspace).
    #[arg(long)]
    pub global: bool,
}

/// `ligi query` subcommands.
#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// Evaluate an AND/OR tag expression
    #[command(name = "t")]
    Tag(QueryTagArgs),
    /// List known tags, merged across local and global indexes
    List(QueryListArgs),
}

/// Arguments for `ligi query t`.
#[derive(Args, Debug)]
pub struct QueryTagArgs {
    /// Tag names interleaved with `&` (intersection) / `|` (union),
    /// evaluated strictly left-to-right.
    #[arg(trailing_var_arg = true, required = true)]
    pub expr: Vec<String>,
    /// Start the workspace search from this directory instead of the cwd.
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,
    /// Rewrite repo-relative result paths to absolute.
    #[arg(long)]
    pub absolute: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
    /// Also copy the serialized output to the system clipboard (OSC 52).
    #[arg(long)]
    pub clipboard: bool,
    /// Auto-reindex first if the local index is stale.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub index: bool,
}

/// Arguments for `ligi query list`.
#[derive(Args, Debug)]
pub struct QueryListArgs {
    /// Only show tags known to the global index.
    #[arg(long, conflicts_with = "local_only")]
    pub global_only: bool,
    /// Only show tags known to the local index.
    #[arg(long, conflicts_with = "global_only")]
    pub local_only: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Arguments for `ligi check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Drop broken tag entries and dead workspace registrations.
    #[arg(long)]
    pub prune: bool,
    /// Limit to this workspace root instead of every registered workspace.
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Output format shared by `query` and `check`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, line-oriented.
    Text,
    /// Machine-readable JSON.
    Json,
}
