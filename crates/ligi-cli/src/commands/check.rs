//! `ligi check`: report (and optionally repair) workspace health.

use crate::cli::{CheckArgs, Cli, OutputFormat};
use anyhow::Result;
use ligi_core::{pruner, registry, staleness, workspace};
use serde_json::json;

/// Run `ligi check`.
pub fn run(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let start_dir = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let ctx = workspace::resolve(&start_dir)?;
    let global_art = ctx.global_root.join("art");
    if cli.verbose {
        eprintln!("checking workspace at {}", ctx.root.display());
    }

    let stale = staleness::is_stale(&ctx.art_path);
    let mut local_reports = Vec::new();
    let mut global_report = None;

    if args.prune {
        if args.root.is_some() {
            let report = pruner::prune_local(&ctx.root, &ctx.art_path)?;
            local_reports.push((ctx.root.clone(), report));
        } else {
            let roots: Vec<_> = registry::load(&global_art)?.roots.into_iter().collect();
            for root in &roots {
                let art = root.join("art");
                if let Ok(report) = pruner::prune_local(root, &art) {
                    local_reports.push((root.clone(), report));
                }
            }
            global_report = Some(pruner::prune_global(&global_art)?);
        }
    }

    match args.output {
        OutputFormat::Text => {
            println!("stale: {stale}");
            for (root, report) in &local_reports {
                println!(
                    "{}: pruned {} entries, {} tags",
                    root.display(),
                    report.entries_pruned,
                    report.tags_pruned
                );
            }
            if let Some(g) = &global_report {
                println!(
                    "global: pruned {} repos, {} entries, {} tags",
                    g.pruned_repos, g.entries_pruned, g.tags_pruned
                );
            }
        }
        OutputFormat::Json => {
            let payload = json!({
                "stale": stale,
                "pruned_repos": global_report.as_ref().map(|g| g.pruned_repos).unwrap_or(0),
                "pruned_local_tag_entries": local_reports.iter().map(|(_, r)| r.entries_pruned).sum::<usize>(),
                "pruned_global_tag_entries": global_report.as_ref().map(|g| g.entries_pruned).unwrap_or(0),
                "pruned_tags": local_reports.iter().map(|(_, r)| r.tags_pruned).sum::<usize>()
                    + global_report.as_ref().map(|g| g.tags_pruned).unwrap_or(0),
            });
            println!("{}", serde_json::to_string(&payload)?);
        }
    }
    Ok(())
}
