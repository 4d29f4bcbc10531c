//! `apply` - converge the filer to the manifest

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{ExecuteOptions, ExecuteSummary};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::progress::CommitProgress;
use crate::ui::{self, PromptConfirm};

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let session = super::open(ctx)?;
    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        jobs: args.jobs,
    };
    let mut confirm = PromptConfirm::new(args.yes || !session.config.apply.confirm);
    let mut progress = CommitProgress::new(ctx.quiet);

    let mut summary = ExecuteSummary::default();
    let mut aborted = Vec::new();
    for kind in session.kinds(&args.target) {
        let declarations = session.declarations(kind, &args.target);
        match session
            .reconciler
            .run(kind, &declarations, &opts, &mut progress, &mut confirm)
        {
            Ok(report) => summary.merge(&report.summary),
            Err(e) => {
                ui::error(&format!("{e:#}"));
                aborted.push(kind);
            }
        }
    }

    if opts.dry_run {
        println!();
        ui::info("Dry run - no changes made");
    } else {
        print_summary(&summary);
    }

    if !aborted.is_empty() {
        bail!("Could not reconcile: {}", aborted.join(", "));
    }
    if !summary.is_success() {
        bail!("{} resource(s) failed", summary.failed);
    }
    Ok(())
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.total_changes() == 0 && summary.is_success() {
        println!("  {} Everything is converged", "✓".green().bold());
    } else if summary.is_success() {
        println!("  {} Changes applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Changes applied with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.removed > 0 {
        println!("    • {} resources destroyed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}
