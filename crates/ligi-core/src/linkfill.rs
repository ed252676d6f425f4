//! Link filler: rewrites a bare `[[t/x]]` into
//! `[[t/x]](<relative>)` in place, where `<relative>` points at
//! `art/index/tags/x.md` from the source file's own directory.
//!
//! Uses the same four-state scan as [`crate::parser`] so that tokens inside
//! fenced code, inline code, or HTML comments are left untouched, but runs
//! as a rewriting pass that copies bytes into an output buffer instead of
//! only collecting tags.

use crate::parser::validate_tag_name;
use crate::walker::{WalkOptions, walk};
use crate::writer::write_if_changed;
use crate::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    FencedCode,
    InlineCode,
    HtmlComment,
}

fn backtick_run(bytes: &[u8], i: usize) -> usize {
    bytes[i..].iter().take_while(|&&b| b == b'`').count()
}

fn match_fence_at(bytes: &[u8], i: usize) -> Option<usize> {
    let mut j = i;
    while j < bytes.len() && matches!(bytes[j], b' ' | b'\t' | b'\r') {
        j += 1;
    }
    let run = backtick_run(bytes, j);
    if run >= 3 { Some(j + run) } else { None }
}

fn memchr_newline(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'\n').map(|p| p + from)
}

fn skip_to_next_line(bytes: &[u8], i: usize) -> usize {
    memchr_newline(bytes, i).map_or(bytes.len(), |pos| pos + 1)
}

/// Compute the relative link target from a source file's directory to
/// `art/index/tags/<tag>.md`, using `/`-joined components regardless of
/// host path separator (the result is embedded in a Markdown file, not
/// used as an OS path).
fn relative_link(file_rel_path: &str, tag: &str) -> String {
    let mut file_dir: Vec<&str> = file_rel_path.split('/').collect();
    file_dir.pop(); // drop the filename, keep directory components

    let mut target: Vec<String> = vec!["art".into(), "index".into(), "tags".into()];
    let tag_segments: Vec<&str> = tag.split('/').collect();
    for (idx, seg) in tag_segments.iter().enumerate() {
        if idx + 1 == tag_segments.len() {
            target.push(format!("{seg}.md"));
        } else {
            target.push((*seg).to_string());
        }
    }

    let common = file_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| **a == **b)
        .count();

    let ups = file_dir.len() - common;
    let mut parts: Vec<String> = std::iter::repeat_with(|| "..".to_string())
        .take(ups)
        .collect();
    parts.extend(target[common..].iter().cloned());
    parts.join("/")
}

/// The outcome of filling links in one file's bytes.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// The rewritten bytes (identical to input if `count == 0`).
    pub bytes: Vec<u8>,
    /// Number of `[[t/x]]` tokens that were given a link target.
    pub count: usize,
}

/// Scan `bytes` (the content of a file at `file_rel_path`) and insert a
/// relative link after every bare `[[t/x]]` token found in normal text.
#[must_use]
pub fn fill_links(bytes: &[u8], file_rel_path: &str) -> FillOutcome {
    let mut state = State::Normal;
    let mut i = 0usize;
    let len = bytes.len();
    let mut at_line_start = true;
    let mut out = Vec::with_capacity(bytes.len());
    let mut count = 0usize;

    while i < len {
        if at_line_start && matches!(state, State::Normal | State::FencedCode) {
            if let Some(after_fence) = match_fence_at(bytes, i) {
                state = match state {
                    State::Normal => State::FencedCode,
                    State::FencedCode => State::Normal,
                    _ => unreachable!(),
                };
                let next = skip_to_next_line(bytes, after_fence);
                out.extend_from_slice(&bytes[i..next]);
                i = next;
                at_line_start = true;
                continue;
            }
        }
        at_line_start = false;

        match state {
            State::FencedCode => {
                let next = skip_to_next_line(bytes, i);
                out.extend_from_slice(&bytes[i..next]);
                i = next;
                at_line_start = true;
            }
            State::InlineCode => {
                out.push(bytes[i]);
                if bytes[i] == b'`' {
                    state = State::Normal;
                } else if bytes[i] == b'\n' {
                    at_line_start = true;
                }
                i += 1;
            }
            State::HtmlComment => {
                if bytes[i..].starts_with(b"-->") {
                    out.extend_from_slice(b"-->");
                    state = State::Normal;
                    i += 3;
                } else {
                    out.push(bytes[i]);
                    if bytes[i] == b'\n' {
                        at_line_start = true;
                    }
                    i += 1;
                }
            }
            State::Normal => {
                if bytes[i] == b'\n' {
                    out.push(b'\n');
                    i += 1;
                    at_line_start = true;
                } else if bytes[i..].starts_with(b"<!--") {
                    out.extend_from_slice(b"<!--");
                    state = State::HtmlComment;
                    i += 4;
                } else if bytes[i..].starts_with(b"[[t/") {
                    i += 4;
                    let start = i;
                    match bytes[start..].windows(2).position(|w| w == b"]]") {
                        Some(rel) => {
                            let raw = &bytes[start..start + rel];
                            let end = start + rel + 2;
                            let candidate = String::from_utf8_lossy(raw).into_owned();
                            out.extend_from_slice(b"[[t/");
                            out.extend_from_slice(raw);
                            out.extend_from_slice(b"]]");
                            i = end;
                            if validate_tag_name(&candidate).is_ok() {
                                let already_linked = bytes.get(i) == Some(&b'(');
                                if !already_linked {
                                    let link = relative_link(file_rel_path, &candidate);
                                    out.push(b'(');
                                    out.extend_from_slice(link.as_bytes());
                                    out.push(b')');
                                    count += 1;
                                }
                            }
                        }
                        None => {
                            out.extend_from_slice(&bytes[start - 4..]);
                            i = len;
                        }
                    }
                } else {
                    out.push(bytes[i]);
                    if bytes[i] == b'`' {
                        state = State::InlineCode;
                    }
                    i += 1;
                }
            }
        }
    }

    FillOutcome { bytes: out, count }
}

/// Per-file report, used to emit `fill_tag_links` / `fill_tag_links_skip`
/// log entries.
#[derive(Debug, Clone)]
pub struct FileFillReport {
    /// The file's `art/`-relative path.
    pub path: String,
    /// Links filled in this file.
    pub count: usize,
    /// Whether the file was actually rewritten.
    pub written: bool,
}

/// Fill links across every source file under `art_path`.
pub fn fill_all(workspace_root: &Path, art_path: &Path, options: &WalkOptions) -> Result<Vec<FileFillReport>> {
    let walked = walk(workspace_root, art_path, options);
    let mut reports = Vec::new();
    for rel_path in &walked.files {
        if let Some(report) = fill_one(workspace_root, rel_path)? {
            reports.push(report);
        }
    }
    Ok(reports)
}

/// Fill links in a single named file (the `--file` targeted path).
pub fn fill_one(workspace_root: &Path, file_rel_path: &str) -> Result<Option<FileFillReport>> {
    let abs = workspace_root.join(file_rel_path);
    let Ok(bytes) = fs::read(&abs) else {
        return Ok(None);
    };
    let outcome = fill_links(&bytes, file_rel_path);
    let write = write_if_changed(&abs, &outcome.bytes)?;
    Ok(Some(FileFillReport {
        path: file_rel_path.to_string(),
        count: outcome.count,
        written: write.written,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_bare_tag_at_art_root() {
        let out = fill_links(b"hello [[t/proj]] world", "art/a.md");
        assert_eq!(out.count, 1);
        assert_eq!(out.bytes, b"hello [[t/proj]](index/tags/proj.md) world");
    }

    #[test]
    fn computes_relative_path_from_nested_dir() {
        let out = fill_links(b"[[t/proj]]", "art/notes/a.md");
        assert_eq!(
            String::from_utf8(out.bytes).unwrap(),
            "[[t/proj]](../index/tags/proj.md)"
        );
    }

    #[test]
    fn already_linked_token_is_left_alone() {
        let input = b"[[t/proj]](index/tags/proj.md) more text".to_vec();
        let out = fill_links(&input, "art/a.md");
        assert_eq!(out.count, 0);
        assert_eq!(out.bytes, input);
    }

    #[test]
    fn is_idempotent_on_second_pass() {
        let first = fill_links(b"[[t/proj]] and [[t/proj]]", "art/a.md");
        assert_eq!(first.count, 2);
        let second = fill_links(&first.bytes, "art/a.md");
        assert_eq!(second.count, 0);
        assert_eq!(second.bytes, first.bytes);
    }

    #[test]
    fn skips_fenced_code_and_inline_code_and_comments() {
        let text = "```\n[[t/skip]]\n```\n`[[t/also_skip]]` <!-- [[t/nope]] --> [[t/real]]";
        let out = fill_links(text.as_bytes(), "art/a.md");
        assert_eq!(out.count, 1);
        assert!(String::from_utf8(out.bytes).unwrap().contains("[[t/real]](index/tags/real.md)"));
    }

    #[test]
    fn slash_tag_maps_to_nested_tag_file() {
        let out = fill_links(b"[[t/proj/urgent]]", "art/a.md");
        assert_eq!(
            String::from_utf8(out.bytes).unwrap(),
            "[[t/proj/urgent]](index/tags/proj/urgent.md)"
        );
    }

    #[test]
    fn invalid_tag_is_copied_verbatim_without_a_link() {
        let out = fill_links(b"[[t/has space]]", "art/a.md");
        assert_eq!(out.count, 0);
        assert_eq!(out.bytes, b"[[t/has space]]");
    }

    proptest::proptest! {
        /// Link-filler idempotency:
        /// `fill_links(fill_links(F)) = fill_links(F)` byte-for-byte, for
        /// any mix of tag names and surrounding plain text.
        #[test]
        fn idempotent_for_arbitrary_tag_sequences(
            names in proptest::collection::vec("[A-Za-z0-9_]{1,16}", 0..6),
            rel_path in "art(/[a-z]{1,8}){0,3}/f\\.md",
        ) {
            let mut text = String::new();
            for name in &names {
                text.push_str(&format!("see [[t/{name}]] here\n"));
            }
            let first = fill_links(text.as_bytes(), &rel_path);
            let second = fill_links(&first.bytes, &rel_path);
            proptest::prop_assert_eq!(second.count, 0);
            proptest::prop_assert_eq!(second.bytes, first.bytes);
        }
    }
}
