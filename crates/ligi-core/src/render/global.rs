//! Global renderer: merges one workspace's absolute paths into
//! `~/.ligi/art/index/{ligi_tags.md, tags/<tag>.md}` without disturbing any
//! other workspace's entries, plus the authoritative `index --global` rebuild
//! that re-walks every registered workspace from scratch.
//!
//! The on-disk format is identical to the local index; the only
//! difference is that entries are absolute paths instead of `art/`-relative
//! ones. Rendering and round-trip parsing are reused directly from
//! [`super::local`].

use super::local::{LocalRenderReport, load_local, render_local};
use crate::tagmap;
use crate::types::TagMap;
use crate::walker::WalkOptions;
use crate::Result;
use std::path::{Path, PathBuf};

fn is_under(path: &str, prefix: &str) -> bool {
    Path::new(path).starts_with(Path::new(prefix))
}

/// Merge `local_map` (an `art/`-relative `TagMap` for `workspace_root`) into
/// the global index at `global_art_path`.
///
/// Every existing global entry whose absolute path lies under
/// `workspace_root/art` is dropped first, then the current absolute paths
/// are inserted - so a file renamed or untagged in this workspace since the
/// last merge doesn't linger in the global view, while every other
/// workspace's entries are left untouched.
pub fn merge_workspace(
    local_map: &TagMap,
    workspace_root: &Path,
    global_art_path: &Path,
) -> Result<LocalRenderReport> {
    let workspace_art_prefix = workspace_root.join("art").to_string_lossy().into_owned();

    let mut global_map = load_local(global_art_path)?;
    global_map.retain_paths(|_tag, path| !is_under(path, &workspace_art_prefix));

    for (tag, paths) in local_map.iter() {
        for path in paths {
            let abs = workspace_root.join(path).to_string_lossy().into_owned();
            global_map.insert(tag.clone(), abs);
        }
    }

    render_local(&global_map, global_art_path)
}

/// Rebuild the global index from scratch by re-walking every registered
/// workspace root. Roots with no `art/` directory are skipped with a
/// warning rather than failing the whole rebuild.
pub fn rebuild_global(
    roots: &[PathBuf],
    global_art_path: &Path,
    options: &WalkOptions,
) -> Result<(LocalRenderReport, Vec<String>)> {
    let mut fresh = TagMap::new();
    let mut warnings = Vec::new();

    for root in roots {
        let art = root.join("art");
        if !art.exists() {
            warnings.push(format!(
                "skipping {}: no art/ directory",
                root.display()
            ));
            continue;
        }
        let outcome = tagmap::build(root, &art, options);
        warnings.extend(outcome.warnings);
        for (tag, paths) in outcome.map.iter() {
            for path in paths {
                let abs = root.join(path).to_string_lossy().into_owned();
                fresh.insert(tag.clone(), abs);
            }
        }
    }

    let report = render_local(&fresh, global_art_path)?;
    Ok((report, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_does_not_disturb_other_workspace_entries() {
        let dir = TempDir::new().unwrap();
        let global_art = dir.path().join("global_art");
        let ws_a = dir.path().join("ws_a");
        let ws_b = dir.path().join("ws_b");
        fs::create_dir_all(&ws_a).unwrap();
        fs::create_dir_all(&ws_b).unwrap();

        let mut map_a = TagMap::new();
        map_a.insert("shared".to_string(), "art/a.md".to_string());
        merge_workspace(&map_a, &ws_a, &global_art).unwrap();

        let mut map_b = TagMap::new();
        map_b.insert("shared".to_string(), "art/b.md".to_string());
        merge_workspace(&map_b, &ws_b, &global_art).unwrap();

        let merged = load_local(&global_art).unwrap();
        let paths: Vec<_> = merged.paths("shared").unwrap().iter().collect();
        assert_eq!(
            paths,
            vec![
                &ws_a.join("art/a.md").to_string_lossy().into_owned(),
                &ws_b.join("art/b.md").to_string_lossy().into_owned(),
            ]
        );

        // Re-merging ws_a with a shrunk map removes only ws_a's entry.
        let shrunk_a = TagMap::new();
        merge_workspace(&shrunk_a, &ws_a, &global_art).unwrap();
        let merged = load_local(&global_art).unwrap();
        let paths: Vec<_> = merged.paths("shared").unwrap().iter().collect();
        assert_eq!(paths, vec![&ws_b.join("art/b.md").to_string_lossy().into_owned()]);
    }

    #[test]
    fn rebuild_skips_roots_without_art() {
        let dir = TempDir::new().unwrap();
        let global_art = dir.path().join("global_art");
        let ws = dir.path().join("ws");
        fs::create_dir_all(ws.join("art")).unwrap();
        fs::write(ws.join("art/a.md"), "[[t/proj]]").unwrap();
        let missing = dir.path().join("gone");

        let (report, warnings) = rebuild_global(
            &[ws.clone(), missing],
            &global_art,
            &WalkOptions::default(),
        )
        .unwrap();

        assert!(report.master_written);
        assert_eq!(warnings.len(), 1);
        let merged = load_local(&global_art).unwrap();
        assert!(merged.paths("proj").is_some());
    }
}
