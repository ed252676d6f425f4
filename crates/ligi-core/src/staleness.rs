//! Staleness oracle: gates auto-reindexing ahead of a query.
//! Deliberately metadata-only - it never reads file contents, only compares
//! modification times, so it stays cheap enough to run before every query.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

fn master_path(art_path: &Path) -> std::path::PathBuf {
    art_path.join("index").join("ligi_tags.md")
}

/// Whether `art_path`'s local index is stale relative to its source tree.
///
/// Stale if `ligi_tags.md` doesn't exist yet, or if any `.md` file under
/// `art/` (excluding `art/index/`) has a modification time newer than it.
#[must_use]
pub fn is_stale(art_path: &Path) -> bool {
    let Ok(master_meta) = fs::metadata(master_path(art_path)) else {
        return true;
    };
    let Ok(master_mtime) = master_meta.modified() else {
        return true;
    };

    any_source_newer_than(art_path, master_mtime)
}

fn any_source_newer_than(art_path: &Path, cutoff: SystemTime) -> bool {
    let Ok(entries) = fs::read_dir(art_path) else {
        return false;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if path.file_name().and_then(|n| n.to_str()) == Some("index") {
                continue;
            }
            if any_source_newer_than(&path, cutoff) {
                return true;
            }
        } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            if let Ok(meta) = fs::metadata(&path) {
                if let Ok(mtime) = meta.modified() {
                    if mtime > cutoff {
                        return true;
                    }
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn missing_master_is_stale() {
        let dir = TempDir::new().unwrap();
        assert!(is_stale(dir.path()));
    }

    #[test]
    fn fresh_master_after_all_sources_is_not_stale() {
        let dir = TempDir::new().unwrap();
        let art = dir.path();
        fs::write(art.join("a.md"), "x").unwrap();
        sleep(Duration::from_millis(10));
        fs::create_dir_all(art.join("index")).unwrap();
        fs::write(master_path(art), "master").unwrap();

        assert!(!is_stale(art));
    }

    #[test]
    fn newly_touched_source_makes_it_stale() {
        let dir = TempDir::new().unwrap();
        let art = dir.path();
        fs::create_dir_all(art.join("index")).unwrap();
        fs::write(master_path(art), "master").unwrap();
        sleep(Duration::from_millis(10));
        fs::write(art.join("a.md"), "newer").unwrap();

        assert!(is_stale(art));
    }

    #[test]
    fn changes_under_index_dir_do_not_count() {
        let dir = TempDir::new().unwrap();
        let art = dir.path();
        fs::create_dir_all(art.join("index").join("tags")).unwrap();
        fs::write(master_path(art), "master").unwrap();
        sleep(Duration::from_millis(10));
        fs::write(art.join("index").join("tags").join("proj.md"), "x").unwrap();

        assert!(!is_stale(art));
    }
}
