//! Primary entrypoint for the `ligi` CLI binary.

use colored::Colorize;
use std::process::ExitCode;

use ligi_cli::error::CliError;

fn main() -> ExitCode {
    if let Err(err) = ligi_cli::run() {
        let cli_err: CliError = err.into();
        eprintln!("{} {cli_err}", "error:".red().bold());
        return ExitCode::from(u8::try_from(cli_err.exit_code()).unwrap_or(1));
    }
    ExitCode::SUCCESS
}
