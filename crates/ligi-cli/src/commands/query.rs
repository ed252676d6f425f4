//! `ligi query t`/`ligi query list`: read the tag index.

use crate::cli::{Cli, OutputFormat, QueryCommands, QueryListArgs, QueryTagArgs};
use crate::utils::clipboard;
use anyhow::Result;
use ligi_core::config::Config;
use ligi_core::types::LogEntry;
use ligi_core::walker::WalkOptions;
use ligi_core::{actionlog, linkfill, query, render, staleness, tagmap, workspace};
use serde_json::json;
use std::time::Instant;

/// Run `ligi query <subcommand>`.
pub fn run(cli: &Cli, command: &QueryCommands) -> Result<()> {
    match command {
        QueryCommands::Tag(args) => run_tag_expr(cli, args),
        QueryCommands::List(args) => run_list(args),
    }
}

fn run_tag_expr(cli: &Cli, args: &QueryTagArgs) -> Result<()> {
    let started = Instant::now();
    let start_dir = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let ctx = workspace::resolve(&start_dir)?;

    let mut files_walked = 0;
    let mut tags_found = 0;
    let mut writes = 0;
    if args.index && staleness::is_stale(&ctx.art_path) {
        if cli.verbose {
            eprintln!("index is stale, reindexing");
        }
        let config = Config::load(&ctx.art_path)?;
        let options = WalkOptions {
            ignore_globs: config.index.ignore_patterns,
            follow_symlinks: config.index.follow_symlinks,
        };
        let build = tagmap::build(&ctx.root, &ctx.art_path, &options);
        let render_report = render::local::render_local(&build.map, &ctx.art_path)?;
        let fill_reports = linkfill::fill_all(&ctx.root, &ctx.art_path, &options)?;
        actionlog::log(&ctx.art_path, &LogEntry::new("query", "auto_reindex"));

        files_walked = build.files_walked;
        tags_found = build.map.tags().count();
        writes = usize::from(render_report.master_written)
            + render_report.per_tag.iter().filter(|r| r.written).count()
            + fill_reports.iter().filter(|r| r.written).count();
    }

    let result_set = query::evaluate(&args.expr, &ctx.art_path)?;
    let mut results: Vec<String> = if args.absolute {
        result_set
            .into_iter()
            .map(|p| ctx.root.join(&p).to_string_lossy().into_owned())
            .collect()
    } else {
        result_set.into_iter().collect()
    };
    results.sort();

    let tag_expr = args.expr.join(" ");
    let rendered = match args.output {
        OutputFormat::Text => results.join("\n"),
        OutputFormat::Json => serde_json::to_string(&json!({
            "tag_expr": tag_expr,
            "results": results,
        }))?,
    };
    println!("{rendered}");

    if args.clipboard {
        let _ = clipboard::copy_to_clipboard(&rendered);
    }

    if cli.debug {
        eprintln!(
            "query: {files_walked} files walked, {tags_found} tags found, {writes} writes performed, {} results in {:?}",
            results.len(),
            started.elapsed()
        );
    }
    Ok(())
}

fn run_list(args: &QueryListArgs) -> Result<()> {
    let start_dir = std::env::current_dir()?;
    let ctx = workspace::resolve(&start_dir)?;
    let global_art = ctx.global_root.join("art");
    let entries = query::list_tags(&ctx.art_path, &global_art)?;

    let filtered: Vec<_> = entries
        .into_iter()
        .filter(|entry| {
            if args.global_only {
                entry.markers.contains(&"G")
            } else if args.local_only {
                entry.markers.contains(&"L")
            } else {
                true
            }
        })
        .collect();

    match args.output {
        OutputFormat::Text => {
            for entry in &filtered {
                println!("{} [{}]", entry.tag, entry.markers.join(""));
            }
        }
        OutputFormat::Json => {
            let json_entries: Vec<_> = filtered
                .iter()
                .map(|entry| json!({"tag": entry.tag, "markers": entry.markers}))
                .collect();
            println!("{}", serde_json::to_string(&json_entries)?);
        }
    }
    Ok(())
}
