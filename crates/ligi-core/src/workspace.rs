//! Workspace detection and path resolution: walks ancestor
//! directories to find the enclosing `art/`, reads its config, and records
//! an org parent when one exists above a `repo` workspace.

use crate::config::{Config, WorkspaceType};
use crate::types::{WorkspaceContext, WorkspaceKind};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Ancestor walk depth limit, guarding against symlink loops.
pub const DEPTH_LIMIT: usize = 10;

fn find_art_root(start: &Path, depth_limit: usize) -> Option<PathBuf> {
    let mut current = Some(start.to_path_buf());
    let mut visited = HashSet::new();
    let mut depth = 0;

    while let Some(dir) = current {
        if depth >= depth_limit {
            break;
        }
        let canonical = fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
        if !visited.insert(canonical) {
            break;
        }
        if dir.join("art").is_dir() {
            return Some(dir);
        }
        current = dir.parent().map(Path::to_path_buf);
        depth += 1;
    }
    None
}

fn global_root() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".ligi"))
        .unwrap_or_else(|| PathBuf::from(".ligi"))
}

/// Resolve the [`WorkspaceContext`] for `start_dir`: find the enclosing
/// `art/`, read its config, and - for a `repo` workspace - look further up
/// the tree for an owning `org` workspace.
pub fn resolve(start_dir: &Path) -> Result<WorkspaceContext> {
    let root = find_art_root(start_dir, DEPTH_LIMIT)
        .ok_or_else(|| Error::NoWorkspace(start_dir.display().to_string()))?;
    let art_path = root.join("art");
    let config = Config::load(&art_path)?;
    let global_root = global_root();

    let mut kind = match config.workspace.kind {
        WorkspaceType::Global => WorkspaceKind::Global,
        WorkspaceType::Org => WorkspaceKind::Org,
        WorkspaceType::Repo => WorkspaceKind::Repo,
    };

    let mut org = None;
    if matches!(kind, WorkspaceKind::Repo) {
        if let Some(parent_start) = root.parent() {
            if let Some(org_root) = find_art_root(parent_start, DEPTH_LIMIT) {
                let org_art = org_root.join("art");
                let org_config = Config::load(&org_art)?;
                if org_config.workspace.kind == WorkspaceType::Org {
                    org = Some(Box::new(WorkspaceContext {
                        root: org_root,
                        template_paths: vec![org_art.join("template")],
                        art_path: org_art,
                        kind: WorkspaceKind::Org,
                        name: org_config.workspace.name,
                        org: None,
                        global_root: global_root.clone(),
                    }));
                }
            }
        }
        // No owning org was found: this repo stands on its own. The
        // org/repo relationship is the only thing that distinguishes a
        // plain `repo` from a standalone one.
        if org.is_none() {
            kind = WorkspaceKind::Standalone;
        }
    }

    let mut template_paths = vec![art_path.join("template")];
    if let Some(org) = &org {
        template_paths.push(org.art_path.join("template"));
    }
    template_paths.push(global_root.join("art").join("template"));

    Ok(WorkspaceContext {
        root,
        art_path,
        kind,
        name: config.workspace.name,
        org,
        global_root,
        template_paths,
    })
}

/// Convenience wrapper returning just the resolved `art/` path, the
/// operation every command needs before it can do anything else.
pub fn resolve_art_path(start_dir: &Path) -> Result<PathBuf> {
    Ok(resolve(start_dir)?.art_path)
}
