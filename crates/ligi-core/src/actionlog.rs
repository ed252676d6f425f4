//! Structured action logger: append-only JSONL at
//! `<art>/.ligi_log.jsonl`, decoupled from the `tracing`-based operator
//! diagnostics the CLI emits separately. Logging must never fail a command,
//! so every error here is swallowed rather than propagated.

use crate::types::LogEntry;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

fn log_path(art_path: &Path) -> std::path::PathBuf {
    art_path.join(".ligi_log.jsonl")
}

/// Append `entry` as one JSON line. Any failure to serialize, open, or
/// write is silently ignored - a best-effort audit trail, not a journal the
/// rest of the system depends on for correctness.
pub fn log(art_path: &Path, entry: &LogEntry) {
    let Ok(line) = serde_json::to_string(entry) else {
        return;
    };
    let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(art_path))
    else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
