//! Workspace registry: `~/.ligi/art/index/ligi_global_index.md`,
//! the list of workspace roots known to the tool.

use crate::render::extract_bullet_section;
use crate::writer::write_if_changed;
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn registry_path(global_art_path: &Path) -> PathBuf {
    global_art_path.join("index").join("ligi_global_index.md")
}

/// The parsed registry: known workspace roots plus a verbatim `## Notes`
/// block, if present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Registered workspace roots, sorted.
    pub roots: BTreeSet<PathBuf>,
    /// Raw text following the `## Notes` heading, preserved byte-for-byte
    /// across rewrites, or `None` if the section is absent.
    pub notes: Option<String>,
}

fn render(registry: &Registry) -> Vec<u8> {
    let mut out = String::from(
        "# Ligi Global Index\n\nThis file is auto-maintained by ligi. It tracks all repositories initialized with ligi.\n\n## Repositories\n",
    );
    out.push('\n');
    for root in &registry.roots {
        out.push_str("- ");
        out.push_str(&root.to_string_lossy());
        out.push('\n');
    }
    if let Some(notes) = &registry.notes {
        out.push_str("\n## Notes\n");
        out.push_str(notes);
    }
    out.into_bytes()
}

fn parse(content: &str) -> Registry {
    let roots = extract_bullet_section(content, "Repositories")
        .into_iter()
        .map(PathBuf::from)
        .collect();
    let notes = content.find("## Notes\n").map(|idx| {
        let after_heading = idx + "## Notes\n".len();
        content[after_heading..].to_string()
    });
    Registry { roots, notes }
}

/// Load the registry, returning an empty one if the file doesn't exist yet.
pub fn load(global_art_path: &Path) -> Result<Registry> {
    match fs::read_to_string(registry_path(global_art_path)) {
        Ok(content) => Ok(parse(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Registry::default()),
        Err(e) => Err(Error::io("reading ligi_global_index.md", e)),
    }
}

/// Register `workspace_root` (de-duplicated, sorted), preserving any
/// existing `## Notes` block verbatim. This is the contract `ligi init`
/// relies on when bringing a new workspace under global tracking.
pub fn register(global_art_path: &Path, workspace_root: &Path) -> Result<()> {
    fs::create_dir_all(global_art_path.join("index"))
        .map_err(|e| Error::io("creating global index dir", e))?;
    let mut registry = load(global_art_path)?;
    registry.roots.insert(workspace_root.to_path_buf());
    write_if_changed(&registry_path(global_art_path), &render(&registry))?;
    debug!(root = %workspace_root.display(), "registered workspace root");
    Ok(())
}

/// Remove roots whose directory (or its `art/`) no longer exists. Returns
/// the number of roots pruned. The `## Notes` block survives even if the
/// registry becomes empty.
pub fn prune(global_art_path: &Path) -> Result<usize> {
    let mut registry = load(global_art_path)?;
    let before = registry.roots.len();
    registry
        .roots
        .retain(|root| root.exists() && root.join("art").exists());
    let pruned = before - registry.roots.len();
    write_if_changed(&registry_path(global_art_path), &render(&registry))?;
    Ok(pruned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn register_is_sorted_and_deduped() {
        let dir = TempDir::new().unwrap();
        let global_art = dir.path().join("global").join("art");
        register(&global_art, Path::new("/ws/b")).unwrap();
        register(&global_art, Path::new("/ws/a")).unwrap();
        register(&global_art, Path::new("/ws/a")).unwrap();

        let registry = load(&global_art).unwrap();
        let roots: Vec<_> = registry.roots.iter().collect();
        assert_eq!(roots, vec![&PathBuf::from("/ws/a"), &PathBuf::from("/ws/b")]);
    }

    #[test]
    fn notes_survive_rewrite() {
        let dir = TempDir::new().unwrap();
        let global_art = dir.path().join("global").join("art");
        fs::create_dir_all(global_art.join("index")).unwrap();
        fs::write(
            registry_path(&global_art),
            "# Ligi Global Index\n\nThis file is auto-maintained by ligi. It tracks all repositories initialized with ligi.\n\n## Repositories\n\n- /ws/a\n\n## Notes\nkeep this please\n",
        )
        .unwrap();

        register(&global_art, Path::new("/ws/b")).unwrap();
        let registry = load(&global_art).unwrap();
        assert_eq!(registry.notes.as_deref(), Some("keep this please\n"));
        assert!(registry.roots.contains(&PathBuf::from("/ws/a")));
        assert!(registry.roots.contains(&PathBuf::from("/ws/b")));
    }

    #[test]
    fn prune_removes_missing_roots_but_keeps_notes() {
        let dir = TempDir::new().unwrap();
        let global_art = dir.path().join("global").join("art");
        let alive = dir.path().join("alive");
        fs::create_dir_all(alive.join("art")).unwrap();
        register(&global_art, &alive).unwrap();
        register(&global_art, Path::new("/does/not/exist")).unwrap();

        let pruned = prune(&global_art).unwrap();
        assert_eq!(pruned, 1);
        let registry = load(&global_art).unwrap();
        assert_eq!(registry.roots.len(), 1);
        assert!(registry.roots.contains(&alive));
    }
}
