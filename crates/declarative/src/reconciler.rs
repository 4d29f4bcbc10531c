//! Run orchestration
//!
//! A run of one kind is discover → plan → commit. The reconciler holds an
//! exclusive section per kind across the whole run, so two runs of the
//! same kind never interleave while different kinds stay independent.

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::error::Error;
use crate::executor::commit;
use crate::planner::{ExecutionPlan, plan};
use crate::provider::{BoxedProvider, Provider};
use crate::resource::{ExecuteOptions, ExecuteSummary, ResourceDeclaration};
use anyhow::{Result, anyhow};
use std::sync::{Mutex, PoisonError};

/// Plan and commit outcome of one kind
#[derive(Debug)]
pub struct RunReport {
    pub plan: ExecutionPlan,
    pub summary: ExecuteSummary,
}

struct Registered {
    provider: BoxedProvider,
    lock: Mutex<()>,
}

/// Registry of providers, one per kind
#[derive(Default)]
pub struct Reconciler {
    providers: Vec<Registered>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. A later provider for the same kind replaces the
    /// earlier one.
    pub fn register(&mut self, provider: BoxedProvider) {
        let kind = provider.kind().name;
        self.providers.retain(|r| r.provider.kind().name != kind);
        self.providers.push(Registered {
            provider,
            lock: Mutex::new(()),
        });
    }

    pub fn with_provider(mut self, provider: BoxedProvider) -> Self {
        self.register(provider);
        self
    }

    /// Names of the registered kinds, in registration order
    pub fn kinds(&self) -> Vec<&'static str> {
        self.providers.iter().map(|r| r.provider.kind().name).collect()
    }

    fn registered(&self, kind: &str) -> Result<&Registered> {
        self.providers
            .iter()
            .find(|r| r.provider.kind().name == kind)
            .ok_or_else(|| anyhow!("No provider registered for kind '{kind}'"))
    }

    /// Phase 1 only: discover and plan one kind
    pub fn plan(
        &self,
        kind: &str,
        declarations: &[ResourceDeclaration],
        opts: &ExecuteOptions,
    ) -> Result<ExecutionPlan> {
        let registered = self.registered(kind)?;
        let _guard = registered.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(discover_and_plan(registered.provider.as_ref(), declarations, opts)?)
    }

    /// Discover, plan and commit one kind.
    ///
    /// A discovery failure aborts the run before any action is taken.
    pub fn run<P, C>(
        &self,
        kind: &str,
        declarations: &[ResourceDeclaration],
        opts: &ExecuteOptions,
        progress: &mut P,
        confirm: &mut C,
    ) -> Result<RunReport>
    where
        P: ProgressCallback,
        C: ConfirmCallback,
    {
        let registered = self.registered(kind)?;
        let _guard = registered.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let provider = registered.provider.as_ref();
        let plan = discover_and_plan(provider, declarations, opts)?;
        let summary = commit(provider, &plan, opts, progress, confirm)?;
        log::debug!(
            "{kind}: {} created, {} removed, {} failed",
            summary.created,
            summary.removed,
            summary.failed
        );
        Ok(RunReport { plan, summary })
    }
}

fn discover_and_plan(
    provider: &dyn Provider,
    declarations: &[ResourceDeclaration],
    opts: &ExecuteOptions,
) -> std::result::Result<ExecutionPlan, Error> {
    let kind = provider.kind();
    let instances = provider.instances().map_err(|source| Error::RemoteQuery {
        kind: kind.name.to_string(),
        source,
    })?;
    log::debug!("Discovered {} {} instances", instances.len(), kind.name);
    Ok(plan(kind, declarations, instances, opts.jobs))
}
