//! Query evaluator: left-to-right AND/OR folding over per-tag
//! index file sets, with no operator precedence and no parentheses - by
//! design, since the grammar is meant to be readable off a shell history
//! without remembering binding rules.

use crate::render::extract_bullet_section;
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

fn is_operator(token: &str) -> bool {
    token == "&" || token == "|"
}

fn tag_file_path(art_path: &Path, tag: &str) -> std::path::PathBuf {
    art_path.join("index").join("tags").join(format!("{tag}.md"))
}

/// Read the `## Files` entries for one tag. A missing per-tag file yields
/// an empty set rather than an error.
fn read_tag_set(art_path: &Path, tag: &str) -> BTreeSet<String> {
    fs::read_to_string(tag_file_path(art_path, tag))
        .ok()
        .map(|content| extract_bullet_section(&content, "Files").into_iter().collect())
        .unwrap_or_default()
}

/// Evaluate a sequence of CLI-positional tokens (tag names interleaved with
/// `&`/`|` operators) against the per-tag index files under `art_path`.
///
/// Folding is strictly left-to-right: `a & b | c` means `(a & b) | c`, never
/// the reverse. A leading operator, a trailing operator, or two consecutive
/// operators is a usage error (exit code 2).
pub fn evaluate(tokens: &[String], art_path: &Path) -> Result<BTreeSet<String>> {
    let mut iter = tokens.iter();
    let first = iter
        .next()
        .ok_or_else(|| Error::Usage("query expression is empty".to_string()))?;
    if is_operator(first) {
        return Err(Error::Usage(format!(
            "query cannot start with operator '{first}'"
        )));
    }

    let mut acc = read_tag_set(art_path, first);

    while let Some(op) = iter.next() {
        if !is_operator(op) {
            return Err(Error::Usage(format!(
                "expected '&' or '|' between tags, found '{op}'"
            )));
        }
        let tag = iter
            .next()
            .ok_or_else(|| Error::Usage(format!("trailing operator '{op}'")))?;
        if is_operator(tag) {
            return Err(Error::Usage(format!(
                "consecutive operators '{op}' '{tag}'"
            )));
        }
        let set = read_tag_set(art_path, tag);
        acc = match op.as_str() {
            "&" => acc.intersection(&set).cloned().collect(),
            "|" => acc.union(&set).cloned().collect(),
            _ => unreachable!(),
        };
    }

    Ok(acc)
}

/// One row of `query list`'s merged view: a tag name plus which index(es)
/// it's known to, in `["G", "L"]` order when present in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// The tag name.
    pub tag: String,
    /// `"G"` and/or `"L"`, global first.
    pub markers: Vec<&'static str>,
}

/// `query list`: merge the global and local master tag indexes, deduplicated
/// by tag name, each entry annotated with which index(es) carry it.
pub fn list_tags(art_path: &Path, global_art_path: &Path) -> Result<Vec<ListEntry>> {
    let local = crate::render::local::load_local(art_path)?;
    let global = crate::render::local::load_local(global_art_path)?;

    let mut merged: BTreeMap<String, Vec<&'static str>> = BTreeMap::new();
    for tag in global.tags() {
        merged.entry(tag.clone()).or_default().push("G");
    }
    for tag in local.tags() {
        merged.entry(tag.clone()).or_default().push("L");
    }

    Ok(merged
        .into_iter()
        .map(|(tag, markers)| ListEntry { tag, markers })
        .collect())
}
