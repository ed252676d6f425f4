//! CLI error handling: maps a `ligi_core::Error` onto the process exit codes
//! documented for the CLI.

use std::fmt;

/// A CLI-level error carrying the exit code its underlying cause implies.
#[derive(Debug)]
pub struct CliError {
    /// The underlying error.
    pub source: anyhow::Error,
}

impl CliError {
    /// The exit code this error should surface as. Defaults to `1`
    /// (filesystem/IO) unless the cause is a recognized `ligi_core::Error`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.source
            .downcast_ref::<ligi_core::Error>()
            .map_or(1, ligi_core::Error::exit_code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl<E: Into<anyhow::Error>> From<E> for CliError {
    fn from(err: E) -> Self {
        Self { source: err.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_maps_to_exit_code_two() {
        let err: CliError = ligi_core::Error::Usage("bad query".to_string()).into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_workspace_error_maps_to_exit_code_three() {
        let err: CliError = ligi_core::Error::NoWorkspace("/tmp".to_string()).into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unrecognized_error_defaults_to_one() {
        let err: CliError = anyhow::anyhow!("boom").into();
        assert_eq!(err.exit_code(), 1);
    }
}
