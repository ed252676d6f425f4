//! Local renderer: writes `art/index/ligi_tags.md` and
//! `art/index/tags/<tag>.md` deterministically from a `TagMap`.

use super::{extract_bullet_section, extract_master_tags};
use crate::types::TagMap;
use crate::writer::write_if_changed;
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-write outcome for one tag's index file.
#[derive(Debug, Clone)]
pub struct TagWriteReport {
    /// The tag rendered.
    pub tag: String,
    /// Whether bytes were actually written.
    pub written: bool,
}

/// The full report from a `render_local` call, used to emit the
/// `write_local_index` / `write_local_index_skip` log entries.
#[derive(Debug, Default)]
pub struct LocalRenderReport {
    /// One entry per tag (including placeholders), in sorted tag order.
    pub per_tag: Vec<TagWriteReport>,
    /// Whether `ligi_tags.md` itself was rewritten.
    pub master_written: bool,
}

fn tags_dir(art_path: &Path) -> PathBuf {
    art_path.join("index").join("tags")
}

fn tag_file_path(art_path: &Path, tag: &str) -> PathBuf {
    tags_dir(art_path).join(format!("{tag}.md"))
}

fn master_path(art_path: &Path) -> PathBuf {
    art_path.join("index").join("ligi_tags.md")
}

fn render_per_tag_content(tag: &str, paths: &BTreeSet<String>) -> Vec<u8> {
    let mut out = format!("# Tag: {tag}\n\nThis file is auto-maintained by ligi.\n\n## Files\n");
    if paths.is_empty() {
        out.push('\n');
    } else {
        out.push('\n');
        for path in paths {
            out.push_str("- ");
            out.push_str(path);
            out.push('\n');
        }
    }
    out.into_bytes()
}

fn render_master_content(tags: &[String]) -> Vec<u8> {
    let mut out = String::from(
        "# Ligi Tag Index\n\nThis file is auto-maintained by ligi. Each tag links to its index file.\n\n## Tags\n",
    );
    out.push('\n');
    for tag in tags {
        out.push_str(&format!("- [{tag}](tags/{tag}.md)\n"));
    }
    out.into_bytes()
}

/// Render the local master and per-tag index files for `map`.
///
/// Tags that were listed in the *previous* on-disk master list but have no
/// entries in `map` are rendered as empty placeholders rather than deleted
/// (the placeholder-tolerance policy).
pub fn render_local(map: &TagMap, art_path: &Path) -> Result<LocalRenderReport> {
    fs::create_dir_all(tags_dir(art_path))
        .map_err(|e| Error::io("creating art/index/tags", e))?;

    let previous_master_tags: BTreeSet<String> = fs::read_to_string(master_path(art_path))
        .ok()
        .map(|content| extract_master_tags(&content).into_iter().collect())
        .unwrap_or_default();

    let mut all_tags: BTreeSet<String> = map.tags().cloned().collect();
    all_tags.extend(previous_master_tags);

    let mut report = LocalRenderReport::default();
    let mut tags_for_master = Vec::new();

    for tag in &all_tags {
        let empty = BTreeSet::new();
        let paths = map.paths(tag).unwrap_or(&empty);
        let content = render_per_tag_content(tag, paths);
        let outcome = write_if_changed(&tag_file_path(art_path, tag), &content)?;
        report.per_tag.push(TagWriteReport {
            tag: tag.clone(),
            written: outcome.written,
        });
        if !paths.is_empty() {
            tags_for_master.push(tag.clone());
        }
    }
    tags_for_master.sort();

    let master_content = render_master_content(&tags_for_master);
    let master_outcome = write_if_changed(&master_path(art_path), &master_content)?;
    report.master_written = master_outcome.written;

    Ok(report)
}

/// Load the currently-rendered local `TagMap` by re-reading
/// `ligi_tags.md` and every listed per-tag file. Returns an empty map if
/// the master index doesn't exist yet.
pub fn load_local(art_path: &Path) -> Result<TagMap> {
    let mut map = TagMap::new();
    let Ok(master_content) = fs::read_to_string(master_path(art_path)) else {
        return Ok(map);
    };
    for tag in extract_master_tags(&master_content) {
        let Ok(tag_content) = fs::read_to_string(tag_file_path(art_path, &tag)) else {
            continue;
        };
        for path in extract_bullet_section(&tag_content, "Files") {
            map.insert(tag.clone(), path);
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn art_dir() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let art = dir.path().join("art");
        fs::create_dir_all(&art).unwrap();
        (dir, art)
    }

    fn sample_map() -> TagMap {
        let mut map = TagMap::new();
        map.insert("proj".to_string(), "art/a.md".to_string());
        map.insert("proj".to_string(), "art/b.md".to_string());
        map.insert("urgent".to_string(), "art/b.md".to_string());
        map
    }

    #[test]
    fn scenario_one_basic_index() {
        let (_dir, art) = art_dir();
        render_local(&sample_map(), &art).unwrap();

        let master = fs::read_to_string(master_path(&art)).unwrap();
        assert!(master.contains("- [proj](tags/proj.md)"));
        assert!(master.contains("- [urgent](tags/urgent.md)"));
        // sorted: proj before urgent
        assert!(master.find("proj").unwrap() < master.find("urgent").unwrap());

        let proj = fs::read_to_string(tag_file_path(&art, "proj")).unwrap();
        assert!(proj.contains("- art/a.md"));
        assert!(proj.contains("- art/b.md"));
        assert!(proj.find("art/a.md").unwrap() < proj.find("art/b.md").unwrap());

        let urgent = fs::read_to_string(tag_file_path(&art, "urgent")).unwrap();
        assert!(urgent.contains("- art/b.md"));
    }

    #[test]
    fn idempotent_rerun_writes_nothing() {
        let (_dir, art) = art_dir();
        let map = sample_map();
        render_local(&map, &art).unwrap();

        let report = render_local(&map, &art).unwrap();
        assert!(!report.master_written);
        assert!(report.per_tag.iter().all(|r| !r.written));
    }

    #[test]
    fn disappearing_tag_becomes_placeholder_not_deleted() {
        let (_dir, art) = art_dir();
        render_local(&sample_map(), &art).unwrap();

        let mut shrunk = TagMap::new();
        shrunk.insert("proj".to_string(), "art/a.md".to_string());
        render_local(&shrunk, &art).unwrap();

        assert!(tag_file_path(&art, "urgent").exists());
        let urgent = fs::read_to_string(tag_file_path(&art, "urgent")).unwrap();
        assert!(!urgent.contains("- art/"));

        let master = fs::read_to_string(master_path(&art)).unwrap();
        assert!(!master.contains("urgent"));
    }

    #[test]
    fn load_local_round_trips() {
        let (_dir, art) = art_dir();
        let map = sample_map();
        render_local(&map, &art).unwrap();
        let loaded = load_local(&art).unwrap();
        assert_eq!(loaded, map);
    }

    proptest::proptest! {
        /// Render idempotency: `render_local ∘ render_local =
        /// render_local` on disk - the second invocation writes zero bytes,
        /// for any tag map built from generated (tag, path) pairs.
        #[test]
        fn render_local_is_idempotent(
            entries in proptest::collection::vec(
                ("[a-z]{1,8}", "art/[a-z]{1,8}\\.md"),
                0..10,
            ),
        ) {
            let (_dir, art) = art_dir();
            let mut map = TagMap::new();
            for (tag, path) in entries {
                map.insert(tag, path);
            }
            render_local(&map, &art).unwrap();
            let report = render_local(&map, &art).unwrap();
            proptest::prop_assert!(!report.master_written);
            proptest::prop_assert!(report.per_tag.iter().all(|r| !r.written));
        }
    }
}
