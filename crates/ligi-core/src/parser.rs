//! Tag parser: a pure function from UTF-8 bytes to a deduplicated,
//! insertion-ordered sequence of validated tag names.
//!
//! The scanner is a four-state machine (`Normal`, `FencedCode`,
//! `InlineCode`, `HtmlComment`) that never fails on malformed markdown -
//! every edge case degrades to "skip the rest" rather than an error.

use std::collections::HashSet;

/// Maximum tag name length.
pub const MAX_TAG_LEN: usize = 255;

/// Why a candidate tag was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTagReason {
    /// The text between `[[t/` and `]]` was empty.
    Empty,
    /// The candidate contains a `..` path-traversal segment.
    ContainsDotDot,
    /// The candidate is longer than [`MAX_TAG_LEN`].
    TooLong,
    /// The candidate contains a character outside `[A-Za-z0-9_.\-/]`, or a
    /// leading/trailing `/`.
    InvalidChar(char),
}

impl std::fmt::Display for InvalidTagReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTagReason::Empty => write!(f, "empty"),
            InvalidTagReason::ContainsDotDot => write!(f, "contains '..'"),
            InvalidTagReason::TooLong => write!(f, "length>255"),
            InvalidTagReason::InvalidChar(c) => write!(f, "invalid character '{c}'"),
        }
    }
}

/// A rejected candidate, before the caller attaches the source file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// The raw (invalid) candidate text found between `[[t/` and `]]`.
    pub candidate: String,
    /// Why it was rejected.
    pub reason: InvalidTagReason,
}

impl ParseWarning {
    /// Render the warning in its wire format:
    /// `invalid tag '<name>' in <file> - <reason>`.
    #[must_use]
    pub fn message(&self, file: &str) -> String {
        format!(
            "invalid tag '{}' in {file} - {}",
            self.candidate, self.reason
        )
    }
}

/// The result of parsing one file's bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Valid tags, deduplicated, in first-seen order.
    pub tags: Vec<String>,
    /// Invalid candidates encountered along the way.
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    FencedCode,
    InlineCode,
    HtmlComment,
}

/// Validate a candidate tag name against the tag-name syntax rules.
///
/// Checks empty, forbidden characters (including the leading/trailing `/`
/// boundary rule), `..` traversal, and length, in that order, so the first
/// reason reported is always the same for a given malformed input.
#[must_use]
pub fn validate_tag_name(candidate: &str) -> Result<(), InvalidTagReason> {
    if candidate.is_empty() {
        return Err(InvalidTagReason::Empty);
    }
    if candidate.starts_with('/') || candidate.ends_with('/') {
        return Err(InvalidTagReason::InvalidChar('/'));
    }
    for c in candidate.chars() {
        if !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/')) {
            return Err(InvalidTagReason::InvalidChar(c));
        }
    }
    if candidate.contains("..") {
        return Err(InvalidTagReason::ContainsDotDot);
    }
    if candidate.len() > MAX_TAG_LEN {
        return Err(InvalidTagReason::TooLong);
    }
    Ok(())
}

/// Strip a leading UTF-8 BOM, if present.
fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}

/// Count a run of `` ` `` characters starting at `i`, returning the run
/// length (0 if `bytes[i]` isn't a backtick).
fn backtick_run(bytes: &[u8], i: usize) -> usize {
    bytes[i..].iter().take_while(|&&b| b == b'`').count()
}

/// If the line starting at `i` opens or closes a fenced code block (its
/// first non-whitespace characters form a run of >= 3 backticks), return
/// the index just past that fence marker.
fn match_fence_at(bytes: &[u8], i: usize) -> Option<usize> {
    let mut j = i;
    while j < bytes.len() && matches!(bytes[j], b' ' | b'\t' | b'\r') {
        j += 1;
    }
    let run = backtick_run(bytes, j);
    if run >= 3 { Some(j + run) } else { None }
}

/// Return the index just after the next `\n` at or after `i`, or the end of
/// the buffer if there is none.
fn skip_to_next_line(bytes: &[u8], i: usize) -> usize {
    match memchr_newline(bytes, i) {
        Some(pos) => pos + 1,
        None => bytes.len(),
    }
}

fn memchr_newline(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'\n').map(|p| p + from)
}

/// Parse `bytes` and return the valid tags (deduplicated, insertion order)
/// plus any invalid-candidate warnings encountered along the way.
#[must_use]
pub fn parse(bytes: &[u8]) -> ParseOutcome {
    let bytes = strip_bom(bytes);
    let mut state = State::Normal;
    let mut i = 0usize;
    let len = bytes.len();
    let mut at_line_start = true;

    let mut seen = HashSet::new();
    let mut outcome = ParseOutcome::default();

    while i < len {
        if at_line_start && matches!(state, State::Normal | State::FencedCode) {
            if let Some(after_fence) = match_fence_at(bytes, i) {
                state = match state {
                    State::Normal => State::FencedCode,
                    State::FencedCode => State::Normal,
                    _ => unreachable!(),
                };
                i = skip_to_next_line(bytes, after_fence);
                at_line_start = true;
                continue;
            }
        }
        at_line_start = false;

        match state {
            State::FencedCode => {
                i = skip_to_next_line(bytes, i);
                at_line_start = true;
            }
            State::InlineCode => {
                if bytes[i] == b'`' {
                    state = State::Normal;
                    i += 1;
                } else if bytes[i] == b'\n' {
                    i += 1;
                    at_line_start = true;
                } else {
                    i += 1;
                }
            }
            State::HtmlComment => {
                if bytes[i..].starts_with(b"-->") {
                    state = State::Normal;
                    i += 3;
                } else if bytes[i] == b'\n' {
                    i += 1;
                    at_line_start = true;
                } else {
                    i += 1;
                }
            }
            State::Normal => {
                if bytes[i] == b'\n' {
                    i += 1;
                    at_line_start = true;
                } else if bytes[i..].starts_with(b"<!--") {
                    state = State::HtmlComment;
                    i += 4;
                } else if bytes[i..].starts_with(b"[[t/") {
                    i += 4;
                    let start = i;
                    match bytes[start..].windows(2).position(|w| w == b"]]") {
                        Some(rel) => {
                            let raw = &bytes[start..start + rel];
                            i = start + rel + 2;
                            let candidate = String::from_utf8_lossy(raw).into_owned();
                            match validate_tag_name(&candidate) {
                                Ok(()) => {
                                    if seen.insert(candidate.clone()) {
                                        outcome.tags.push(candidate);
                                    }
                                }
                                Err(reason) => outcome
                                    .warnings
                                    .push(ParseWarning { candidate, reason }),
                            }
                        }
                        None => {
                            // No closing `]]` before EOF: discard, nothing
                            // further in the file can close a tag either.
                            i = len;
                        }
                    }
                } else if bytes[i] == b'`' {
                    state = State::InlineCode;
                    i += 1;
                } else {
                    i += 1;
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_tag_in_normal_text() {
        let out = parse(b"hello [[t/proj]] world");
        assert_eq!(out.tags, vec!["proj"]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn dedupe_preserves_first_seen_order() {
        let out = parse(b"[[t/b]] [[t/a]] [[t/b]] [[t/a]]");
        assert_eq!(out.tags, vec!["b", "a"]);
    }

    #[test]
    fn fenced_code_is_ignored() {
        let text = "```\n[[t/skip]]\n```\n[[t/real]]";
        let out = parse(text.as_bytes());
        assert_eq!(out.tags, vec!["real"]);
    }

    #[test]
    fn unterminated_fence_skips_rest_of_file() {
        let text = "```\n[[t/skip]]\nstill inside [[t/also_skip]]";
        let out = parse(text.as_bytes());
        assert!(out.tags.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn inline_code_is_ignored() {
        let out = parse(b"before `[[t/also_skip]]` after [[t/real]]");
        assert_eq!(out.tags, vec!["real"]);
    }

    #[test]
    fn html_comment_is_ignored() {
        let out = parse(b"<!-- [[t/nope]] --> [[t/real]]");
        assert_eq!(out.tags, vec!["real"]);
    }

    #[test]
    fn scenario_two_code_and_comment_ignore() {
        let text = "```\n[[t/skip]]\n```\n`[[t/also_skip]]` <!-- [[t/nope]] --> [[t/real]]";
        let out = parse(text.as_bytes());
        assert_eq!(out.tags, vec!["real"]);
    }

    #[test]
    fn nested_brackets_capture_up_to_first_close() {
        let out = parse(b"[[t/a[[b]]]]");
        assert_eq!(out.tags.len(), 0);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].candidate, "a[[b");
        assert_eq!(out.warnings[0].reason, InvalidTagReason::InvalidChar('['));
    }

    #[test]
    fn unterminated_tag_is_discarded_not_an_error() {
        let out = parse(b"[[t/never_closed");
        assert!(out.tags.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn leading_bom_is_skipped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"[[t/proj]]");
        let out = parse(&bytes);
        assert_eq!(out.tags, vec!["proj"]);
    }

    #[test]
    fn crlf_fence_markers_still_close() {
        let text = "```\r\n[[t/skip]]\r\n```\r\n[[t/real]]";
        let out = parse(text.as_bytes());
        assert_eq!(out.tags, vec!["real"]);
    }

    #[test]
    fn invalid_tag_reasons() {
        assert_eq!(validate_tag_name(""), Err(InvalidTagReason::Empty));
        assert_eq!(
            validate_tag_name("a/../b"),
            Err(InvalidTagReason::ContainsDotDot)
        );
        assert_eq!(
            validate_tag_name("/leading"),
            Err(InvalidTagReason::InvalidChar('/'))
        );
        assert_eq!(
            validate_tag_name("trailing/"),
            Err(InvalidTagReason::InvalidChar('/'))
        );
        assert_eq!(
            validate_tag_name("has space"),
            Err(InvalidTagReason::InvalidChar(' '))
        );
        let long = "a".repeat(256);
        assert_eq!(validate_tag_name(&long), Err(InvalidTagReason::TooLong));
        assert_eq!(validate_tag_name("proj/urgent"), Ok(()));
    }

    #[test]
    fn warning_message_format() {
        let w = ParseWarning {
            candidate: "bad tag".to_string(),
            reason: InvalidTagReason::InvalidChar(' '),
        };
        assert_eq!(
            w.message("art/a.md"),
            "invalid tag 'bad tag' in art/a.md - invalid character ' '"
        );
    }

    proptest! {
        /// Round-trip law: stripping a valid tag name and
        /// re-wrapping it in `[[t/...]]`, surrounded by arbitrary plain
        /// text, always yields that name back out of the parser verbatim.
        #[test]
        fn valid_tag_round_trips(
            name in "[A-Za-z0-9_]{1,40}",
            prefix in "[A-Za-z0-9 .,]{0,20}",
            suffix in "[A-Za-z0-9 .,]{0,20}",
        ) {
            let text = format!("{prefix} [[t/{name}]] {suffix}");
            let out = parse(text.as_bytes());
            prop_assert_eq!(out.tags, vec![name]);
        }

        /// A tag-shaped token confined entirely within a fenced code block
        /// is never extracted, regardless of how many such blocks precede
        /// it (the parser round-trip law).
        #[test]
        fn fenced_tokens_never_surface(name in "[A-Za-z0-9_]{1,20}", blocks in 1..4usize) {
            let mut text = String::new();
            for _ in 0..blocks {
                text.push_str(&format!("```\n[[t/{name}]]\n```\n"));
            }
            let out = parse(text.as_bytes());
            prop_assert!(out.tags.is_empty());
        }
    }
}
