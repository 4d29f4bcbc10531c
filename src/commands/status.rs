//! `status` - every declared resource and whether it is converged

use anyhow::Result;
use colored::Colorize;
use declarative::{Ensure, ExecuteOptions, PendingAction};

use crate::Context;
use crate::cli::TargetArgs;
use crate::ui;

pub fn run(ctx: &Context, args: TargetArgs) -> Result<()> {
    let session = super::open(ctx)?;
    let opts = ExecuteOptions::default();

    let mut converged = 0;
    let mut total = 0;
    for kind in session.kinds(&args) {
        let declarations = session.declarations(kind, &args);
        if declarations.is_empty() {
            continue;
        }

        let plan = session.reconciler.plan(kind, &declarations, &opts)?;
        ui::header(kind);

        for entry in &plan.entries {
            total += 1;
            let (symbol, state) = match (entry.action, entry.declaration.ensure) {
                (PendingAction::Create, _) => ("✗".red(), "missing"),
                (PendingAction::Destroy, _) => ("✗".red(), "present, should be absent"),
                (PendingAction::NoOp, _) if entry.is_drifted() => ("~".yellow(), "drifted"),
                (PendingAction::NoOp, Ensure::Present) => ("✓".green(), "present"),
                (PendingAction::NoOp, Ensure::Absent) => ("✓".green(), "absent"),
            };
            if entry.action == PendingAction::NoOp && !entry.is_drifted() {
                converged += 1;
            }
            println!("  {} {:<30} {}", symbol, entry.identity(), state.dimmed());
            for drift in &entry.drift {
                ui::drift(drift);
            }
        }

        for rejection in &plan.rejected {
            total += 1;
            println!("  {} {:<30} {}", "⊘".red(), rejection.identity, rejection.error);
        }
    }

    println!();
    if total == 0 {
        ui::info("Manifest declares no resources");
    } else {
        ui::kv("Converged", &format!("{converged}/{total}"));
    }
    Ok(())
}
