//! TagMap builder: composes the path resolver, tree walker and
//! tag parser into a `tag -> set<path>` map for one `index` invocation.

use crate::parser::parse;
use crate::render::local as local_render;
use crate::types::TagMap;
use crate::walker::{WalkOptions, walk};
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// The outcome of building a `TagMap`: the map itself plus any warnings
/// collected from the walker and parser along the way.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// The built map.
    pub map: TagMap,
    /// Walker/parser warnings (non-fatal).
    pub warnings: Vec<String>,
    /// Number of source files the walk visited, for `--debug` reporting.
    pub files_walked: usize,
}

/// Build a `TagMap` over the whole `art/` tree.
pub fn build(workspace_root: &Path, art_path: &Path, options: &WalkOptions) -> BuildOutcome {
    let walked = walk(workspace_root, art_path, options);
    debug!(files = walked.files.len(), "walked source tree");
    let mut outcome = BuildOutcome {
        warnings: walked.warnings,
        files_walked: walked.files.len(),
        ..Default::default()
    };

    for rel_path in &walked.files {
        index_one_file(workspace_root, rel_path, &mut outcome);
    }

    if !outcome.warnings.is_empty() {
        warn!(count = outcome.warnings.len(), "parse warnings during build");
    }
    outcome
}

/// Build a `TagMap` restricted to a single file: load the persisted local
/// TagMap, drop every entry for this file, then re-parse and re-insert only
/// this file's current tags. A file with no tags left simply contributes no
/// entries (callers that want placeholder tags to survive should not call
/// `TagMap::drop_empty` afterward for this path).
pub fn build_for_file(
    workspace_root: &Path,
    art_path: &Path,
    file_rel_path: &str,
) -> Result<BuildOutcome> {
    let mut map = local_render::load_local(art_path).unwrap_or_default();
    map.remove_path_everywhere(file_rel_path);

    let mut outcome = BuildOutcome {
        map: TagMap::new(),
        warnings: Vec::new(),
        files_walked: 1,
    };
    index_one_file(workspace_root, file_rel_path, &mut outcome);

    for (tag, paths) in outcome.map.iter() {
        for path in paths {
            map.insert(tag.clone(), path.clone());
        }
    }

    Ok(BuildOutcome {
        map,
        warnings: outcome.warnings,
        files_walked: outcome.files_walked,
    })
}

fn index_one_file(workspace_root: &Path, rel_path: &str, outcome: &mut BuildOutcome) {
    let abs = workspace_root.join(rel_path);
    let bytes = match fs::read(&abs) {
        Ok(b) => b,
        Err(_) => return, // file gone or unreadable: no tags for it
    };
    let parsed = parse(&bytes);
    for warning in &parsed.warnings {
        outcome.warnings.push(warning.message(rel_path));
    }
    for tag in parsed.tags {
        outcome.map.insert(tag, rel_path.to_string());
    }
}

/// Load the last-known local `TagMap` without re-walking the tree, used by
/// `--file` targeted re-indexing and by the pruner. Errors if the master
/// index is malformed; absence is not an error (returns an empty map).
pub fn load_persisted(art_path: &Path) -> Result<TagMap> {
    local_render::load_local(art_path).map_err(|e| Error::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn builds_map_from_two_files() {
        let dir = TempDir::new().unwrap();
        let art = dir.path().join("art");
        fs::create_dir_all(&art).unwrap();
        fs::write(art.join("a.md"), "hello [[t/proj]] world").unwrap();
        fs::write(art.join("b.md"), "[[t/proj]] [[t/urgent]]").unwrap();

        let outcome = build(dir.path(), &art, &WalkOptions::default());
        assert_eq!(
            outcome.map.paths("proj").unwrap().iter().collect::<Vec<_>>(),
            vec!["art/a.md", "art/b.md"]
        );
        assert_eq!(
            outcome.map.paths("urgent").unwrap().iter().collect::<Vec<_>>(),
            vec!["art/b.md"]
        );
    }
}
