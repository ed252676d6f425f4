//! # ligi-core
//!
//! Core tag-indexing and query engine for ligi - a human/machine-readable
//! knowledge graph layered over a tree of Markdown notes, built entirely
//! from `[[t/tag_name]]` markers the author already writes.
//!
//! ## Architecture
//!
//! - **Parsing**: a markdown-aware state machine (`parser`) that extracts
//!   tag tokens while skipping fenced code, inline code, and HTML comments.
//! - **Walking**: a tree walker (`walker`) producing the ordered set of
//!   source files under `art/`, honoring ignore globs and symlink policy.
//! - **Indexing**: `tagmap` composes the walker and parser into a
//!   `tag -> set<path>` map for one run, whole-tree or single-file.
//! - **Rendering**: `render::local` and `render::global` turn a `TagMap`
//!   into deterministic, idempotent master/per-tag index files, local and
//!   merged-global respectively.
//! - **Mutation**: `linkfill` rewrites bare tags into linked form in place;
//!   `writer` is the content-comparison guard every on-disk write goes
//!   through so an unchanged render never touches a file's mtime.
//! - **Queries**: `staleness` gates auto-reindexing, `query` evaluates
//!   AND/OR tag expressions over the rendered index.
//! - **Upkeep**: `pruner` drops broken entries and dead workspace
//!   registrations; `registry` owns the global workspace list;
//!   `actionlog` records every mutating action as JSONL.
//! - **Context**: `workspace` resolves which `art/` a command is operating
//!   under, and `config` parses its `ligi.toml`.
//!
//! ## Quick start
//!
//! ```rust
//! use ligi_core::{walker::WalkOptions, workspace, tagmap};
//!
//! # fn run() -> ligi_core::Result<()> {
//! let ctx = workspace::resolve(std::env::current_dir()?.as_path())?;
//! let outcome = tagmap::build(&ctx.root, &ctx.art_path, &WalkOptions::default());
//! println!("found {} tags", outcome.map.tags().count());
//! # Ok(())
//! # }
//! ```

/// Append-only JSONL action logger.
pub mod actionlog;
/// Workspace configuration parsing (`art/config/ligi.toml`).
pub mod config;
/// Error types and the crate-wide `Result` alias.
pub mod error;
/// In-place link-filling rewrite pass.
pub mod linkfill;
/// Tag parser: the markdown-aware state machine.
pub mod parser;
/// Local and global broken-entry pruning.
pub mod pruner;
/// AND/OR query evaluator over per-tag index files.
pub mod query;
/// Global workspace registry.
pub mod registry;
/// Master/per-tag index renderers, local and global.
pub mod render;
/// Staleness oracle gating auto-reindexing.
pub mod staleness;
/// `TagMap` builder: composes the walker and parser for one run.
pub mod tagmap;
/// Core shared data structures.
pub mod types;
/// Tree walker producing the ordered set of source files.
pub mod walker;
/// Workspace detection and path resolution.
pub mod workspace;
/// Content-comparison write guard.
pub mod writer;

pub use error::{Error, Result};
pub use types::{LogEntry, Tag, TagMap, WorkspaceContext, WorkspaceKind};
