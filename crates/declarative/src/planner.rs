//! Phase 1: discovery matching, validation, drift and action selection

use crate::diff::{DiffSummary, PropertyDrift, compute_drift};
use crate::error::Error;
use crate::kind::ResourceKind;
use crate::resource::{Ensure, PendingAction, ResourceDeclaration, ResourceInstance};
use crate::validate::validate_declaration;
use rayon::prelude::*;
use std::collections::HashMap;

/// One declaration with its matched instance and chosen action
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// The validated, munged declaration
    pub declaration: ResourceDeclaration,
    /// The discovered instance, if one matched by identity. A planned
    /// destroy flags it `ensure = absent`.
    pub instance: Option<ResourceInstance>,
    pub action: PendingAction,
    /// Property drift on a matched, present instance. Reported only.
    pub drift: Vec<PropertyDrift>,
}

impl PlanEntry {
    pub fn identity(&self) -> &str {
        &self.declaration.identity
    }

    pub fn is_drifted(&self) -> bool {
        !self.drift.is_empty()
    }
}

/// A declaration the validation layer refused
#[derive(Debug)]
pub struct Rejection {
    pub identity: String,
    pub error: Error,
}

/// The outcome of phase 1 for one kind
#[derive(Debug)]
pub struct ExecutionPlan {
    pub kind: &'static str,
    /// Entries in declaration order
    pub entries: Vec<PlanEntry>,
    /// Declarations that failed validation; they take no part in commit
    pub rejected: Vec<Rejection>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Entries that need a remote call
    pub fn pending(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.action.is_change())
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary {
            rejected: self.rejected.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.action {
                PendingAction::Create => summary.creations += 1,
                PendingAction::Destroy => summary.destructions += 1,
                PendingAction::NoOp if entry.is_drifted() => summary.drifted += 1,
                PendingAction::NoOp => summary.unchanged += 1,
            }
        }
        summary
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.rejected.is_empty()
    }

    /// Check if committing would call the remote
    pub fn has_changes(&self) -> bool {
        self.pending().next().is_some()
    }
}

/// Index discovered instances by identity.
///
/// On a collision the later record wins.
pub fn index_instances(
    kind: &str,
    instances: Vec<ResourceInstance>,
) -> HashMap<String, ResourceInstance> {
    let mut index = HashMap::with_capacity(instances.len());
    for instance in instances {
        let identity = instance.identity.clone();
        if index.insert(identity.clone(), instance).is_some() {
            log::warn!("Duplicate {kind} '{identity}' reported by the remote, keeping the last one");
        }
    }
    index
}

/// Build the plan for one kind from its declarations and the instances
/// discovered during this run.
///
/// Each declaration is evaluated independently on up to `jobs` threads.
pub fn plan(
    kind: &'static ResourceKind,
    declarations: &[ResourceDeclaration],
    instances: Vec<ResourceInstance>,
    jobs: usize,
) -> ExecutionPlan {
    let index = index_instances(kind.name, instances);
    log::debug!(
        "Planning {} {} declarations against {} instances",
        declarations.len(),
        kind.name,
        index.len()
    );

    let evaluate_all = || -> Vec<Result<PlanEntry, Rejection>> {
        declarations
            .par_iter()
            .map(|decl| evaluate(kind, decl, &index))
            .collect()
    };

    let outcomes = match rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
    {
        Ok(pool) => pool.install(evaluate_all),
        Err(e) => {
            log::warn!("Failed to create planning thread pool, planning sequentially: {e}");
            declarations
                .iter()
                .map(|decl| evaluate(kind, decl, &index))
                .collect()
        }
    };

    let mut plan = ExecutionPlan::new(kind.name);
    for outcome in outcomes {
        match outcome {
            Ok(entry) => plan.entries.push(entry),
            Err(rejection) => plan.rejected.push(rejection),
        }
    }
    plan
}

/// Match, validate, diff and choose an action for one declaration
fn evaluate(
    kind: &ResourceKind,
    declaration: &ResourceDeclaration,
    index: &HashMap<String, ResourceInstance>,
) -> Result<PlanEntry, Rejection> {
    let matched = index.get(&declaration.identity);

    let declaration =
        validate_declaration(kind, declaration, matched).map_err(|error| Rejection {
            identity: declaration.identity.clone(),
            error,
        })?;

    let (action, instance, drift) = match (matched, declaration.ensure) {
        (Some(instance), Ensure::Present) => (
            PendingAction::NoOp,
            Some(instance.clone()),
            compute_drift(kind, &declaration, instance),
        ),
        (Some(instance), Ensure::Absent) => {
            let mut flagged = instance.clone();
            flagged.ensure = Ensure::Absent;
            (PendingAction::Destroy, Some(flagged), Vec::new())
        }
        (None, Ensure::Present) => (PendingAction::Create, None, Vec::new()),
        (None, Ensure::Absent) => (PendingAction::NoOp, None, Vec::new()),
    };

    log::debug!("{}: {action}", declaration.label());

    Ok(PlanEntry {
        declaration,
        instance,
        action,
        drift,
    })
}
