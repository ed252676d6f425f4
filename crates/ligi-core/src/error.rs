//! Error types and handling for the ligi tag-indexing engine.
//!
//! This module provides the single `Error` type every fallible operation in
//! `ligi-core` returns. Errors are categorized so the CLI layer can map them
//! onto process exit codes directly, without re-deriving the mapping from
//! string matching.

use thiserror::Error;

/// The main error type for ligi-core operations.
///
/// All public functions in this crate return `Result<T, Error>`. The
/// category a variant belongs to determines the process exit code the CLI
/// layer reports; see [`Error::exit_code`].
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem operation (read, write, rename, mkdir) failed.
    #[error("{context}: {source}")]
    Io {
        /// What the tool was trying to do when the I/O call failed.
        context: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Markdown, TOML, or query-expression content could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A TOML configuration file is malformed or contains invalid values.
    #[error("configuration error: {0}")]
    Config(String),

    /// A path resolves outside the workspace it was expected to stay under.
    #[error("path escapes workspace: {0}")]
    PathEscape(String),

    /// No `art/` directory could be found from the given starting point.
    #[error("no art/ directory found: {0}")]
    NoWorkspace(String),

    /// The caller supplied malformed arguments (CLI usage, malformed query).
    #[error("{0}")]
    Usage(String),

    /// An internal invariant was violated; this indicates a bug in ligi itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a `std::io::Error` with context describing the attempted operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// A short, stable category name used in diagnostics and logs.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io { .. } => "io",
            Error::Parse(_) => "parse",
            Error::Config(_) => "config",
            Error::PathEscape(_) => "path",
            Error::NoWorkspace(_) => "workspace",
            Error::Usage(_) => "usage",
            Error::Internal(_) => "internal",
        }
    }

    /// The process exit code this error should surface as.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            Error::NoWorkspace(_) => 3,
            Error::Internal(_) => 127,
            Error::Io { .. } | Error::Parse(_) | Error::Config(_) | Error::PathEscape(_) => 1,
        }
    }
}

/// Convenience alias used throughout ligi-core.
pub type Result<T> = std::result::Result<T, Error>;
