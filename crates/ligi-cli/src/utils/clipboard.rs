//! Clipboard support using OSC 52 escape sequences.
//!
//! OSC 52 lets an application write to the system clipboard over the
//! terminal itself, which works even over SSH and inside tmux. Format:
//! `\x1b]52;c;<base64>\x07`.
//!
//! Reference: <https://invisible-island.net/xterm/ctlseqs/ctlseqs.html#h3-Operating-System-Commands>

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::{self, Write};

/// Copy `text` to the clipboard via an OSC 52 escape sequence written to
/// stderr, so it doesn't interfere with stdout that might be piped.
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let encoded = STANDARD.encode(text);
    let osc52 = format!("\x1b]52;c;{encoded}\x07");
    io::stderr().write_all(osc52.as_bytes())?;
    io::stderr().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_panic_on_empty_input() {
        let _ = copy_to_clipboard("");
    }

    #[test]
    fn does_not_panic_on_multiline_input() {
        let _ = copy_to_clipboard("art/a.md\nart/b.md");
    }
}
