//! `ligi index`: build or refresh the tag index.

use crate::cli::{Cli, IndexArgs};
use anyhow::Result;
use colored::Colorize;
use ligi_core::config::Config;
use ligi_core::types::LogEntry;
use ligi_core::walker::WalkOptions;
use ligi_core::{WorkspaceContext, WorkspaceKind, actionlog, linkfill, registry, render, tagmap, workspace};
use std::time::Instant;
use tracing::debug;

/// Run `ligi index` with the parsed arguments.
pub fn run(cli: &Cli, args: &IndexArgs) -> Result<()> {
    let start_dir = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let ctx = workspace::resolve(&start_dir)?;

    if args.global && matches!(ctx.kind, WorkspaceKind::Global) {
        return run_global_rebuild(cli, &ctx);
    }

    let config = Config::load(&ctx.art_path)?;
    let options = WalkOptions {
        ignore_globs: config.index.ignore_patterns,
        follow_symlinks: config.index.follow_symlinks,
    };

    if let Some(file) = &args.file {
        return run_file(cli, &ctx, file, args.global);
    }

    run_whole_tree(cli, &ctx, &options, args.global)
}

fn emit_warnings(cli: &Cli, warnings: &[String]) {
    if cli.quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{} {warning}", "warning:".yellow());
    }
}

fn run_whole_tree(cli: &Cli, ctx: &WorkspaceContext, options: &WalkOptions, merge_global: bool) -> Result<()> {
    let started = Instant::now();
    let build = tagmap::build(&ctx.root, &ctx.art_path, options);
    emit_warnings(cli, &build.warnings);

    let render_report = render::local::render_local(&build.map, &ctx.art_path)?;
    let mut writes = usize::from(render_report.master_written);
    for tag_report in &render_report.per_tag {
        let action = if tag_report.written {
            "write_local_index"
        } else {
            "write_local_index_skip"
        };
        actionlog::log(
            &ctx.art_path,
            &LogEntry::new("index", action).with_detail(tag_report.tag.clone()),
        );
        writes += usize::from(tag_report.written);
    }

    let fill_reports = linkfill::fill_all(&ctx.root, &ctx.art_path, options)?;
    for report in &fill_reports {
        let action = if report.count > 0 {
            "fill_tag_links"
        } else {
            "fill_tag_links_skip"
        };
        actionlog::log(
            &ctx.art_path,
            &LogEntry::new("index", action)
                .with_detail(report.path.clone())
                .with_count(report.count),
        );
        writes += usize::from(report.written);
    }

    if merge_global {
        let global_art = ctx.global_root.join("art");
        let merge_report = render::global::merge_workspace(&build.map, &ctx.root, &global_art)?;
        writes += usize::from(merge_report.master_written);
        writes += merge_report.per_tag.iter().filter(|r| r.written).count();
        registry::register(&global_art, &ctx.root)?;
    }

    if cli.debug {
        eprintln!(
            "index: {} files walked, {} tags found, {writes} writes performed in {:?}",
            build.files_walked,
            build.map.tags().count(),
            started.elapsed()
        );
    }
    debug!(elapsed = ?started.elapsed(), "index finished");
    Ok(())
}

fn run_file(cli: &Cli, ctx: &WorkspaceContext, file: &str, merge_global: bool) -> Result<()> {
    let started = Instant::now();
    let outcome = tagmap::build_for_file(&ctx.root, &ctx.art_path, file)?;
    emit_warnings(cli, &outcome.warnings);

    let render_report = render::local::render_local(&outcome.map, &ctx.art_path)?;
    let mut writes = usize::from(render_report.master_written);
    writes += render_report.per_tag.iter().filter(|r| r.written).count();

    if let Some(report) = linkfill::fill_one(&ctx.root, file)? {
        let action = if report.count > 0 {
            "fill_tag_links"
        } else {
            "fill_tag_links_skip"
        };
        actionlog::log(
            &ctx.art_path,
            &LogEntry::new("index", action)
                .with_detail(report.path.clone())
                .with_count(report.count),
        );
        writes += usize::from(report.written);
    }

    if merge_global {
        let global_art = ctx.global_root.join("art");
        let merge_report = render::global::merge_workspace(&outcome.map, &ctx.root, &global_art)?;
        writes += usize::from(merge_report.master_written);
        writes += merge_report.per_tag.iter().filter(|r| r.written).count();
        registry::register(&global_art, &ctx.root)?;
    }

    if cli.debug {
        eprintln!(
            "index --file: {} files walked, {} tags found, {writes} writes performed in {:?}",
            outcome.files_walked,
            outcome.map.tags().count(),
            started.elapsed()
        );
    }
    Ok(())
}

fn run_global_rebuild(cli: &Cli, ctx: &WorkspaceContext) -> Result<()> {
    let started = Instant::now();
    let registered = registry::load(&ctx.art_path)?;
    let roots: Vec<_> = registered.roots.into_iter().collect();
    let options = WalkOptions::default();
    let (report, warnings) = render::global::rebuild_global(&roots, &ctx.art_path, &options)?;
    emit_warnings(cli, &warnings);

    let master_action = if report.master_written {
        "write_global_master_index"
    } else {
        "write_global_master_index_skip"
    };
    actionlog::log(
        &ctx.art_path,
        &LogEntry::new("index", master_action).with_detail("global rebuild"),
    );

    let mut writes = usize::from(report.master_written);
    for tag_report in &report.per_tag {
        let action = if tag_report.written {
            "write_global_index"
        } else {
            "write_global_index_skip"
        };
        actionlog::log(
            &ctx.art_path,
            &LogEntry::new("index", action).with_detail(tag_report.tag.clone()),
        );
        writes += usize::from(tag_report.written);
    }

    if cli.debug {
        eprintln!(
            "index --global: {} workspace roots walked, {} tags found, {writes} writes performed in {:?}",
            roots.len(),
            report.per_tag.len(),
            started.elapsed()
        );
    }
    Ok(())
}
