//! Provider trait
//!
//! A provider binds one [`ResourceKind`] to a remote API. It enumerates the
//! existing instances once per run and performs the create and destroy
//! calls that the commit phase decides on.

use crate::kind::ResourceKind;
use crate::resource::{ResourceDeclaration, ResourceInstance};
use anyhow::Result;

pub trait Provider: Send + Sync {
    /// Schema of the kind this provider manages
    fn kind(&self) -> &'static ResourceKind;

    /// Enumerate every instance currently on the remote.
    ///
    /// Called exactly once per run. Records without an identity are skipped.
    fn instances(&self) -> Result<Vec<ResourceInstance>>;

    /// Create the declared resource
    fn create(&self, declaration: &ResourceDeclaration) -> Result<()>;

    /// Commit a deferred destroy.
    ///
    /// `instance` is the discovered record, which supplies anything the
    /// declaration left out (such as the parent of a nested object).
    fn flush(&self, declaration: &ResourceDeclaration, instance: &ResourceInstance) -> Result<()>;
}

/// Boxed provider for storage in registries
pub type BoxedProvider = Box<dyn Provider>;
