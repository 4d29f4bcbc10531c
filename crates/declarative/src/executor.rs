//! Phase 2: commit the pending actions of a plan

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::error::Error;
use crate::planner::{ExecutionPlan, PlanEntry};
use crate::provider::Provider;
use crate::resource::{ApplyResult, Ensure, ExecuteOptions, ExecuteSummary, PendingAction};
use anyhow::Result;

/// Commit a plan through its provider.
///
/// Pending entries are executed sequentially in plan order. A failed
/// create or destroy is recorded as [`ApplyResult::Failed`] and the
/// remaining entries still run. Rejected declarations count as failures;
/// entries without an action count as unchanged.
///
/// # Arguments
/// * `provider` - The provider for the plan's kind
/// * `plan` - The plan produced by phase 1
/// * `opts` - Execution options (dry_run)
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback, asked once before any change
pub fn commit<P, C>(
    provider: &dyn Provider,
    plan: &ExecutionPlan,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    progress.on_plan(plan);

    let mut summary = ExecuteSummary {
        failed: plan.rejected.len(),
        no_change: plan.entries.len() - plan.pending().count(),
        ..Default::default()
    };

    let pending: Vec<&PlanEntry> = plan.pending().collect();
    if pending.is_empty() {
        return Ok(summary);
    }

    if opts.dry_run {
        summary.skipped += pending.len();
        return Ok(summary);
    }

    let prompt = format!("Apply {} {} change(s)?", pending.len(), plan.kind);
    if !confirm.confirm(&prompt)? {
        summary.skipped += pending.len();
        return Ok(summary);
    }

    progress.on_batch_start(pending.len(), plan.kind);
    for entry in pending {
        let id = entry.declaration.label();
        progress.on_resource_start(&id, entry.action.as_str());
        let result = apply_entry(provider, entry);
        progress.on_resource_complete(&id, &result);
        summary.add_result(&result);
    }
    progress.on_batch_complete();

    Ok(summary)
}

/// Run one entry's remote call
fn apply_entry(provider: &dyn Provider, entry: &PlanEntry) -> ApplyResult {
    let declaration = &entry.declaration;
    let outcome = match (entry.action, &entry.instance) {
        (PendingAction::Create, _) => {
            log::debug!("Creating {}", declaration.label());
            provider.create(declaration).map(|()| ApplyResult::Created)
        }
        (PendingAction::Destroy, Some(instance)) if instance.ensure == Ensure::Absent => {
            log::debug!("Flushing destroy of {}", declaration.label());
            provider
                .flush(declaration, instance)
                .map(|()| ApplyResult::Removed)
        }
        (PendingAction::Destroy, _) => {
            return ApplyResult::Skipped {
                reason: "no instance flagged for removal".into(),
            };
        }
        (PendingAction::NoOp, _) => return ApplyResult::NoChange,
    };

    match outcome {
        Ok(result) => result,
        Err(source) => {
            let error = Error::RemoteAction {
                kind: declaration.kind.clone(),
                identity: declaration.identity.clone(),
                operation: entry.action.as_str().to_string(),
                source,
            };
            log::warn!("{error}");
            ApplyResult::Failed {
                error: error.to_string(),
            }
        }
    }
}
