//! Progress and confirmation callbacks
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific terminal UI.

use crate::planner::ExecutionPlan;
use crate::resource::ApplyResult;
use anyhow::Result;

/// Progress callback for commit operations
///
/// Implement this trait to receive progress updates during commit.
pub trait ProgressCallback: Send {
    /// Called with the finished plan, before confirmation or any change
    fn on_plan(&mut self, _plan: &ExecutionPlan) {}

    /// Called when starting to commit the pending entries of one kind
    fn on_batch_start(&mut self, count: usize, kind: &str);

    /// Called when starting to commit a single resource
    fn on_resource_start(&mut self, id: &str, description: &str);

    /// Called when a resource commit completes
    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize, _kind: &str) {}
    fn on_resource_start(&mut self, _id: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _id: &str, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
