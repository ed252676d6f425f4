//! Tree walker: enumerates source markdown files under `art/`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Options controlling a tree walk, sourced from `[index]` in config.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Glob patterns (matched against the file's basename) to exclude.
    pub ignore_globs: Vec<String>,
    /// Whether to descend into / read symlinked entries.
    pub follow_symlinks: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            ignore_globs: vec!["*.tmp".to_string(), "*.bak".to_string()],
            follow_symlinks: false,
        }
    }
}

/// The result of a tree walk: sorted source paths plus any non-fatal
/// warnings encountered along the way.
#[derive(Debug, Default)]
pub struct WalkResult {
    /// `art/`-relative source file paths (e.g. `art/notes/a.md`), sorted
    /// lexicographically for deterministic downstream processing.
    pub files: Vec<String>,
    /// Human-readable warnings for unreadable entries or skipped symlinks.
    pub warnings: Vec<String>,
}

/// A minimal glob matcher supporting `*` (any run of characters) and `?`
/// (any single character), sufficient for the basename patterns in
/// `[index].ignore_patterns` (defaults: `*.tmp`, `*.bak`).
#[must_use]
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn inner(p: &[u8], t: &[u8]) -> bool {
        match (p.first(), t.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                inner(&p[1..], t) || (!t.is_empty() && inner(p, &t[1..]))
            }
            (Some(b'?'), Some(_)) => inner(&p[1..], &t[1..]),
            (Some(pc), Some(tc)) if pc == tc => inner(&p[1..], &t[1..]),
            _ => false,
        }
    }
    inner(pattern.as_bytes(), text.as_bytes())
}

fn is_ignored(name: &str, globs: &[String]) -> bool {
    globs.iter().any(|g| glob_match(g, name))
}

/// Walk `<workspace_root>/art`, excluding `art/index/`, honoring ignore
/// globs and the symlink policy in `options`. Returns `art/`-relative paths,
/// sorted lexicographically.
#[must_use]
pub fn walk(workspace_root: &Path, art_path: &Path, options: &WalkOptions) -> WalkResult {
    let mut result = WalkResult::default();
    let mut visited = HashSet::new();
    walk_dir(
        workspace_root,
        art_path,
        art_path,
        options,
        &mut visited,
        &mut result,
    );
    result.files.sort();
    result
}

fn walk_dir(
    workspace_root: &Path,
    art_path: &Path,
    dir: &Path,
    options: &WalkOptions,
    visited: &mut HashSet<PathBuf>,
    result: &mut WalkResult,
) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            result
                .warnings
                .push(format!("cannot read directory {}: {e}", dir.display()));
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result
                    .warnings
                    .push(format!("cannot read entry in {}: {e}", dir.display()));
                continue;
            }
        };
        let path = entry.path();

        let Ok(rel_to_art) = path.strip_prefix(art_path) else {
            continue;
        };
        if rel_to_art
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == "index")
        {
            continue;
        }

        let symlink_meta = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                result
                    .warnings
                    .push(format!("cannot stat {}: {e}", path.display()));
                continue;
            }
        };
        let is_symlink = symlink_meta.file_type().is_symlink();
        if is_symlink && !options.follow_symlinks {
            result
                .warnings
                .push(format!("skipping symlink {}", path.display()));
            continue;
        }

        let is_dir = if is_symlink {
            fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            symlink_meta.is_dir()
        };

        if is_dir {
            if is_symlink {
                match fs::canonicalize(&path) {
                    Ok(canon) => {
                        if !visited.insert(canon) {
                            continue; // cycle
                        }
                    }
                    Err(e) => {
                        result
                            .warnings
                            .push(format!("cannot resolve symlink {}: {e}", path.display()));
                        continue;
                    }
                }
            }
            walk_dir(workspace_root, art_path, &path, options, visited, result);
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".md") {
            continue;
        }
        if is_ignored(name, &options.ignore_globs) {
            continue;
        }

        match fs::File::open(&path) {
            Ok(_) => {}
            Err(e) => {
                result
                    .warnings
                    .push(format!("cannot read {}: {e}", path.display()));
                continue;
            }
        }

        let Ok(rel_to_root) = path.strip_prefix(workspace_root) else {
            continue;
        };
        result
            .files
            .push(rel_to_root.to_string_lossy().replace('\\', "/"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        let art = dir.path().join("art");
        fs::create_dir_all(art.join("notes")).unwrap();
        fs::create_dir_all(art.join("index").join("tags")).unwrap();
        fs::write(art.join("a.md"), "hello").unwrap();
        fs::write(art.join("notes").join("b.md"), "hello").unwrap();
        fs::write(art.join("scratch.tmp"), "x").unwrap();
        fs::write(art.join("index").join("ligi_tags.md"), "x").unwrap();
        fs::write(art.join("index").join("tags").join("proj.md"), "x").unwrap();
        dir
    }

    #[test]
    fn excludes_index_and_ignored_globs() {
        let dir = setup();
        let art = dir.path().join("art");
        let result = walk(dir.path(), &art, &WalkOptions::default());
        assert_eq!(result.files, vec!["art/a.md", "art/notes/b.md"]);
    }

    #[test]
    fn glob_matcher_basics() {
        assert!(glob_match("*.tmp", "scratch.tmp"));
        assert!(!glob_match("*.tmp", "scratch.md"));
        assert!(glob_match("a?c", "abc"));
        assert!(!glob_match("a?c", "abbc"));
    }

    #[test]
    fn output_is_sorted() {
        let dir = setup();
        let art = dir.path().join("art");
        fs::write(art.join("zzz.md"), "x").unwrap();
        let result = walk(dir.path(), &art, &WalkOptions::default());
        let mut sorted = result.files.clone();
        sorted.sort();
        assert_eq!(result.files, sorted);
    }
}
