//! Core data structures shared across the ligi tag-indexing engine.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A validated tag name: a non-empty ASCII string over `[A-Za-z0-9_.\-/]`
/// with length <= 255, no `..` segment, and no leading/trailing `/`.
///
/// Tags are treated as logical paths: `/` splits into directory segments
/// for per-tag index file layout. Comparison and ordering are byte-wise,
/// matching the deterministic sort the renderers require.
pub type Tag = String;

/// The in-memory mapping built by a single `index` (or `query`-triggered
/// reindex) invocation: tag name -> ordered, deduplicated set of
/// `art/`-relative source paths.
///
/// Keys and values both sort lexicographically by construction (`BTreeMap`/
/// `BTreeSet`), which is what makes rendering deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: BTreeMap<Tag, BTreeSet<String>>,
}

impl TagMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `tag` appears in `path` (an `art/`-relative path string).
    pub fn insert(&mut self, tag: Tag, path: impl Into<String>) {
        self.entries.entry(tag).or_default().insert(path.into());
    }

    /// Remove every path from every tag's set; used by `--file` re-indexing
    /// to clear stale entries for a single file before re-adding current ones.
    pub fn remove_path_everywhere(&mut self, path: &str) {
        for set in self.entries.values_mut() {
            set.remove(path);
        }
    }

    /// All tags known to this map, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.entries.keys()
    }

    /// The sorted set of paths carrying `tag`, or `None` if the tag is unknown.
    #[must_use]
    pub fn paths(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(tag)
    }

    /// Whether any tag in the map has a non-empty path set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeSet::is_empty)
    }

    /// Iterate over `(tag, paths)` pairs in sorted tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &BTreeSet<String>)> {
        self.entries.iter()
    }

    /// Drop tags whose path set is empty after a removal. Used by the pruner
    /// and by `--file` re-indexing of a file that no longer carries any tags.
    pub fn drop_empty(&mut self) {
        self.entries.retain(|_, set| !set.is_empty());
    }

    /// Keep only `(tag, path)` pairs for which `keep` returns `true`. Used by
    /// the global renderer to purge one workspace's stale entries without
    /// disturbing any other workspace's, and by the local pruner to drop
    /// entries whose source file no longer exists.
    pub fn retain_paths(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        for (tag, set) in &mut self.entries {
            set.retain(|path| keep(tag, path));
        }
    }
}

/// The four kinds of workspace the path resolver can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceKind {
    /// The single global workspace at `~/.ligi`.
    Global,
    /// An organization workspace whose `art/config/ligi.toml` declares
    /// `type = "org"` and owns a single `art/` shared by its member repos.
    Org,
    /// A single-repository workspace (the default when config is absent).
    Repo,
    /// A workspace with no enclosing org and no global registration.
    Standalone,
}

/// The resolved context a command operates under, computed once at command
/// entry and threaded through every subsequent call instead
/// of re-reading the current working directory.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// The workspace root directory (the directory containing `art/`).
    pub root: PathBuf,
    /// The `<root>/art` directory.
    pub art_path: PathBuf,
    /// The detected workspace kind.
    pub kind: WorkspaceKind,
    /// Display name from config, if any.
    pub name: Option<String>,
    /// The parent org's context, if this is a `repo` workspace nested in one.
    pub org: Option<Box<WorkspaceContext>>,
    /// The global workspace root (`~/.ligi`), independent of `kind`.
    pub global_root: PathBuf,
    /// Ordered template search paths: repo, org, global, built-in.
    pub template_paths: Vec<PathBuf>,
}

/// One entry in the append-only JSONL action log.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Unix timestamp (seconds) of the action.
    pub ts: i64,
    /// The command that produced this entry (`index`, `query`, `check`, ...).
    pub cmd: String,
    /// The specific action taken (`write_local_index`, `fill_tag_links`, ...).
    pub action: String,
    /// Free-form detail, typically a path or tag name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// An affected-item count, when the action has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Wall-clock duration of the action in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms: Option<u64>,
}

impl LogEntry {
    /// Start a new entry stamped with the current time.
    #[must_use]
    pub fn new(cmd: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            ts: chrono::Utc::now().timestamp(),
            cmd: cmd.into(),
            action: action.into(),
            detail: None,
            count: None,
            ms: None,
        }
    }

    /// Attach a free-form detail string (builder style).
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach an affected-item count (builder style).
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Attach a wall-clock duration in milliseconds (builder style).
    #[must_use]
    pub fn with_ms(mut self, ms: u64) -> Self {
        self.ms = Some(ms);
        self
    }
}
