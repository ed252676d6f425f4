//! Pruner: drops broken tag entries and dead workspace
//! registrations. Local and global prune share the same shape - filter a
//! loaded `TagMap`'s paths, drop tags that end up empty, re-render - so both
//! are built on top of [`crate::render::local`]'s load/render pair.

use crate::registry;
use crate::render::local as local_render;
use crate::types::TagMap;
use crate::Result;
use std::path::Path;

/// Result of a local prune pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalPruneReport {
    /// Broken path entries removed across all tags.
    pub entries_pruned: usize,
    /// Tags that became fully empty and were dropped from the master list.
    pub tags_pruned: usize,
}

fn tags_emptied(before: &TagMap, after: &TagMap) -> usize {
    before
        .tags()
        .filter(|tag| {
            !before.paths(tag).is_some_and(|p| p.is_empty())
                && after.paths(tag).is_some_and(|p| p.is_empty())
        })
        .count()
}

fn total_entries(map: &TagMap) -> usize {
    map.iter().map(|(_, paths)| paths.len()).sum()
}

/// Drop entries from the local index whose path no longer resolves to an
/// existing file under `workspace_root`. An emptied tag
/// stays as a placeholder file but is dropped from the master list - the
/// same render-time behavior `render_local` already implements.
pub fn prune_local(workspace_root: &Path, art_path: &Path) -> Result<LocalPruneReport> {
    let map = local_render::load_local(art_path)?;
    let mut filtered = map.clone();
    filtered.retain_paths(|_, path| workspace_root.join(path).exists());

    let report = LocalPruneReport {
        entries_pruned: total_entries(&map) - total_entries(&filtered),
        tags_pruned: tags_emptied(&map, &filtered),
    };

    filtered.drop_empty();
    local_render::render_local(&filtered, art_path)?;
    Ok(report)
}

/// Result of a global prune pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalPruneReport {
    /// Registered workspace roots dropped because they (or their `art/`)
    /// no longer exist.
    pub pruned_repos: usize,
    /// Broken or orphaned path entries removed across all global tags.
    pub entries_pruned: usize,
    /// Tags that became fully empty and were dropped from the global
    /// master list.
    pub tags_pruned: usize,
}

/// Prune the workspace registry, then drop global tag entries whose path no
/// longer exists or no longer falls under any surviving registered
/// workspace's `art/`.
pub fn prune_global(global_art_path: &Path) -> Result<GlobalPruneReport> {
    let pruned_repos = registry::prune(global_art_path)?;
    let surviving_prefixes: Vec<String> = registry::load(global_art_path)?
        .roots
        .into_iter()
        .map(|root| root.join("art").to_string_lossy().into_owned())
        .collect();

    let map = local_render::load_local(global_art_path)?;
    let mut filtered = map.clone();
    filtered.retain_paths(|_, path| {
        Path::new(path).exists() && surviving_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    });

    let report = GlobalPruneReport {
        pruned_repos,
        entries_pruned: total_entries(&map) - total_entries(&filtered),
        tags_pruned: tags_emptied(&map, &filtered),
    };

    filtered.drop_empty();
    local_render::render_local(&filtered, global_art_path)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prune_local_drops_missing_paths_and_empties_tag() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();
        let art = workspace.join("art");
        fs::create_dir_all(&art).unwrap();
        fs::write(art.join("a.md"), "x").unwrap();

        let mut map = TagMap::new();
        map.insert("proj".to_string(), "art/a.md".to_string());
        map.insert("proj".to_string(), "art/gone.md".to_string());
        map.insert("urgent".to_string(), "art/gone.md".to_string());
        local_render::render_local(&map, &art).unwrap();

        let report = prune_local(workspace, &art).unwrap();
        assert_eq!(report.entries_pruned, 2);
        assert_eq!(report.tags_pruned, 1);

        let remaining = local_render::load_local(&art).unwrap();
        assert_eq!(
            remaining.paths("proj").unwrap().iter().collect::<Vec<_>>(),
            vec!["art/a.md"]
        );
        assert!(remaining.paths("urgent").is_none());
    }

    #[test]
    fn prune_global_drops_dead_workspace_entries() {
        let dir = TempDir::new().unwrap();
        let global_art = dir.path().join("global_art");
        let alive = dir.path().join("alive");
        fs::create_dir_all(alive.join("art")).unwrap();
        fs::write(alive.join("art").join("a.md"), "x").unwrap();
        registry::register(&global_art, &alive).unwrap();
        registry::register(&global_art, &dir.path().join("dead")).unwrap();

        let mut global_map = TagMap::new();
        global_map.insert(
            "proj".to_string(),
            alive.join("art").join("a.md").to_string_lossy().into_owned(),
        );
        global_map.insert(
            "proj".to_string(),
            dir.path()
                .join("dead")
                .join("art")
                .join("b.md")
                .to_string_lossy()
                .into_owned(),
        );
        local_render::render_local(&global_map, &global_art).unwrap();

        let report = prune_global(&global_art).unwrap();
        assert_eq!(report.pruned_repos, 1);
        assert_eq!(report.entries_pruned, 1);

        let remaining = local_render::load_local(&global_art).unwrap();
        assert_eq!(remaining.paths("proj").unwrap().len(), 1);
    }
}
