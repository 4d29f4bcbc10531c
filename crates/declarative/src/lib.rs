//! # Declarative
//!
//! A framework for declarative reconciliation of remote resources.
//!
//! This crate provides the core abstractions for declaring desired state,
//! discovering what exists on a remote, and converging the two.
//!
//! ## Core Concepts
//!
//! - **ResourceKind**: A static schema of typed attributes with exactly one identity
//! - **ResourceDeclaration**: The desired state of one resource
//! - **ResourceInstance**: What discovery found on the remote during this run
//! - **Provider**: Binds a kind to a remote API (enumerate, create, flush)
//! - **ExecutionPlan**: Phase 1 output: one action per declaration, plus drift
//! - **Reconciler**: Runs discover → plan → commit under a per-kind lock
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     AutoConfirm, ExecuteOptions, NoProgress, Reconciler, ResourceDeclaration,
//! };
//!
//! let reconciler = Reconciler::new().with_provider(Box::new(my_provider));
//!
//! let declarations = vec![
//!     ResourceDeclaration::new("qtree", "q1").with_parameter("volume", "vol1"),
//! ];
//!
//! let report = reconciler.run(
//!     "qtree",
//!     &declarations,
//!     &ExecuteOptions::default(),
//!     &mut NoProgress,
//!     &mut AutoConfirm,
//! )?;
//! println!("{} created", report.summary.created);
//! ```
//!
//! ## Callback Traits
//!
//! - [`ProgressCallback`]: Receives progress updates during commit
//! - [`ConfirmCallback`]: Handles user confirmation before commit
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks.

pub mod attribute;
pub mod compare;
pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod kind;
pub mod planner;
pub mod provider;
pub mod reconciler;
pub mod resource;
pub mod validate;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use attribute::{AttrType, AttributeSpec, Role};
pub use compare::{Comparator, comparator_for};
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use diff::{DiffSummary, PropertyDrift, compute_drift};
pub use error::{Error, Result};
pub use executor::commit;
pub use kind::ResourceKind;
pub use planner::{ExecutionPlan, PlanEntry, Rejection, plan};
pub use provider::{BoxedProvider, Provider};
pub use reconciler::{Reconciler, RunReport};
pub use resource::{
    ApplyResult, Ensure, ExecuteOptions, ExecuteSummary, PendingAction, ResourceDeclaration,
    ResourceInstance,
};
pub use validate::validate_declaration;
pub use value::Value;
