//! Workspace configuration: `art/config/ligi.toml`.
//!
//! A hierarchical, table-per-struct config shape (one struct per TOML
//! table, each with its own `Default` impl), scoped to a single workspace
//! file. Every section is optional in the TOML; missing sections and
//! missing fields fall back to documented defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_ignore_patterns() -> Vec<String> {
    vec!["*.tmp".to_string(), "*.bak".to_string()]
}

const fn default_follow_symlinks() -> bool {
    false
}

const fn default_auto_tags_enabled() -> bool {
    true
}

fn default_version() -> String {
    "0.2.0".to_string()
}

/// Parsed `art/config/ligi.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version string, informational only.
    #[serde(default = "default_version")]
    pub version: String,
    /// `[workspace]` table.
    pub workspace: WorkspaceSection,
    /// `[index]` table.
    pub index: IndexSection,
    /// `[query]` table.
    pub query: QuerySection,
    /// `[auto_tags]` table.
    pub auto_tags: AutoTagsSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace: WorkspaceSection::default(),
            index: IndexSection::default(),
            query: QuerySection::default(),
            auto_tags: AutoTagsSection::default(),
        }
    }
}

/// Workspace kind as declared in config. Missing -> `Repo`
/// (legacy compatibility, spec's explicit rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceType {
    /// The global workspace.
    Global,
    /// An organization workspace that owns a single shared `art/`.
    Org,
    /// A single-repository workspace.
    #[default]
    Repo,
}

/// `[workspace]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    /// The declared workspace type.
    #[serde(rename = "type")]
    pub kind: WorkspaceType,
    /// Relative repo names registered under an org workspace.
    pub repos: Vec<String>,
    /// Display name for the workspace.
    pub name: Option<String>,
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            kind: WorkspaceType::default(),
            repos: Vec::new(),
            name: None,
        }
    }
}

/// `[index]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSection {
    /// Glob patterns excluded from the tree walk.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    /// Whether the walker follows symlinked files and directories.
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            follow_symlinks: default_follow_symlinks(),
        }
    }
}

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One path per line.
    #[default]
    Text,
    /// `{"tag_expr": "...", "results": [...]}`.
    Json,
}

/// `[query]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuerySection {
    /// Default output format when `--output` is not passed.
    pub default_format: OutputFormat,
}

/// `[auto_tags]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTagsSection {
    /// Whether automatic tag injection is enabled (external collaborator;
    /// the core only carries the setting through).
    #[serde(default = "default_auto_tags_enabled")]
    pub enabled: bool,
    /// Template tags, e.g. `["{{org}}", "{{repo}}"]`.
    pub tags: Vec<String>,
}

impl Default for AutoTagsSection {
    fn default() -> Self {
        Self {
            enabled: default_auto_tags_enabled(),
            tags: vec!["{{org}}".to_string(), "{{repo}}".to_string()],
        }
    }
}

impl Config {
    /// Load `art/config/ligi.toml` relative to an `art/` directory.
    ///
    /// Returns the default configuration (not an error) if the file is
    /// absent, matching the "missing -> treat as repo" policy.
    pub fn load(art_path: &Path) -> Result<Self> {
        let path = art_path.join("config").join("ligi.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| Error::io("reading ligi.toml", e))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}
