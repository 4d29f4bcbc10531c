//! `plan` - show what apply would change

use anyhow::Result;
use colored::Colorize;
use declarative::{ExecuteOptions, ExecutionPlan, PendingAction, PropertyDrift};
use serde::Serialize;

use crate::Context;
use crate::cli::PlanArgs;
use crate::ui;

#[derive(Debug, Serialize)]
struct EntryReport<'a> {
    name: &'a str,
    action: PendingAction,
    drift: &'a [PropertyDrift],
}

#[derive(Debug, Serialize)]
struct RejectionReport<'a> {
    name: &'a str,
    error: String,
}

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    kind: &'a str,
    entries: Vec<EntryReport<'a>>,
    rejected: Vec<RejectionReport<'a>>,
}

impl<'a> PlanReport<'a> {
    fn new(plan: &'a ExecutionPlan) -> Self {
        Self {
            kind: plan.kind,
            entries: plan
                .entries
                .iter()
                .map(|e| EntryReport {
                    name: e.identity(),
                    action: e.action,
                    drift: &e.drift,
                })
                .collect(),
            rejected: plan
                .rejected
                .iter()
                .map(|r| RejectionReport {
                    name: &r.identity,
                    error: r.error.to_string(),
                })
                .collect(),
        }
    }
}

pub fn run(ctx: &Context, args: PlanArgs) -> Result<()> {
    let session = super::open(ctx)?;
    let opts = ExecuteOptions::default();

    let mut plans = Vec::new();
    for kind in session.kinds(&args.target) {
        let declarations = session.declarations(kind, &args.target);
        plans.push(session.reconciler.plan(kind, &declarations, &opts)?);
    }

    if args.json {
        let reports: Vec<PlanReport<'_>> = plans.iter().map(PlanReport::new).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for plan in &plans {
        display_plan(plan, ctx.verbose > 0);
    }
    display_totals(&plans);
    Ok(())
}

/// Print the pending changes, drift and rejections of one kind.
///
/// With `all`, converged entries are listed too.
pub fn display_plan(plan: &ExecutionPlan, all: bool) {
    if plan.is_empty() {
        return;
    }
    ui::header(plan.kind);

    for entry in &plan.entries {
        match entry.action {
            PendingAction::Create => {
                println!("  {} {:<30} {}", "+".green(), entry.identity(), "(create)".dimmed());
            }
            PendingAction::Destroy => {
                println!("  {} {:<30} {}", "-".red(), entry.identity(), "(destroy)".dimmed());
            }
            PendingAction::NoOp if entry.is_drifted() => {
                println!("  {} {:<30} {}", "~".yellow(), entry.identity(), "(drifted)".dimmed());
                for drift in &entry.drift {
                    ui::drift(drift);
                }
            }
            PendingAction::NoOp if all => {
                println!("  {} {}", "○".dimmed(), entry.identity());
            }
            PendingAction::NoOp => {}
        }
    }

    for rejection in &plan.rejected {
        println!("  {} {:<30} {}", "✗".red(), rejection.identity, rejection.error);
    }
}

fn display_totals(plans: &[ExecutionPlan]) {
    let mut summary = declarative::DiffSummary::default();
    for plan in plans {
        summary.merge(&plan.summary());
    }

    println!();
    if !summary.has_changes() && summary.drifted == 0 && summary.rejected == 0 {
        ui::success("No changes needed");
        return;
    }
    println!(
        "Plan: {} to create, {} to destroy, {} drifted, {} rejected",
        summary.creations.to_string().green(),
        summary.destructions.to_string().red(),
        summary.drifted.to_string().yellow(),
        summary.rejected.to_string().red()
    );
    if summary.drifted > 0 {
        ui::dim("Drift is reported only; apply does not modify existing resources.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{PlanEntry, ResourceDeclaration};

    #[test]
    fn test_report_serializes_actions_and_drift() {
        let mut plan = ExecutionPlan::new("volume");
        plan.entries.push(PlanEntry {
            declaration: ResourceDeclaration::new("volume", "vol1"),
            instance: None,
            action: PendingAction::Create,
            drift: vec![PropertyDrift {
                property: "state".into(),
                desired: "\"online\"".into(),
                observed: "\"offline\"".into(),
            }],
        });

        let json = serde_json::to_value(PlanReport::new(&plan)).unwrap();
        assert_eq!(json["kind"], "volume");
        assert_eq!(json["entries"][0]["name"], "vol1");
        assert_eq!(json["entries"][0]["action"], "create");
        assert_eq!(json["entries"][0]["drift"][0]["property"], "state");
        assert!(json["rejected"].as_array().unwrap().is_empty());
    }
}
