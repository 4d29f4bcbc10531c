//! # filerkit
//!
//! Client abstraction for storage filer APIs.
//!
//! This crate provides:
//! - [`ResponseTree`], the structured shape of every API answer
//! - The [`Backend`](backend::Backend) trait: list, create and delete one kind
//! - An in-memory filer and a JSON-file backed filer
//! - Error categories and retry with backoff for transient failures
//!
//! ## Example
//!
//! ```no_run
//! use filerkit::{Client, ObjectKind};
//! use filerkit::backend::memory::{MemoryBackend, VolumeRecord};
//!
//! let filer = MemoryBackend::new();
//! filer.add_volume("vol1", VolumeRecord::new("aggr0"));
//!
//! let client = Client::with_backend(Box::new(filer));
//! client
//!     .create(ObjectKind::Qtree, &[("qtree".into(), "q1".into()), ("volume".into(), "vol1".into())])
//!     .expect("create failed");
//!
//! let tree = client.list(ObjectKind::Qtree).expect("list failed");
//! for record in tree.child("qtrees").map(|q| q.children()).unwrap_or_default() {
//!     println!("{}", record.child_string("qtree"));
//! }
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod retry;
pub mod tree;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use tree::ResponseTree;
pub use types::{Call, ObjectKind, RetryConfig};

use backend::Backend;

/// High-level client for filer operations.
///
/// The client wraps a backend and adds retry for list calls. Mutations are
/// passed through exactly once.
pub struct Client {
    backend: Box<dyn Backend>,
    retry: RetryConfig,
}

impl Client {
    /// Create a client with a custom backend and default retry settings.
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            retry: RetryConfig::default(),
        }
    }

    /// Replace the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The active retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    // =========================================================================
    // API Operations
    // =========================================================================

    /// Enumerate every object of a kind, retrying transport failures.
    pub fn list(&self, kind: ObjectKind) -> Result<ResponseTree> {
        log::debug!("Calling {}", kind.list_api());
        retry::with_retry(&self.retry, Some(&retry::LogCallback), || {
            self.backend.list(kind)
        })
    }

    /// Enumerate a kind and return its list collection.
    ///
    /// Fails with [`Error::MalformedResponse`] when the collection element
    /// is missing from the answer.
    pub fn list_records(&self, kind: ObjectKind) -> Result<Vec<ResponseTree>> {
        let tree = self.list(kind)?;
        let collection = tree.child(kind.list_key()).ok_or_else(|| {
            Error::MalformedResponse(format!(
                "{} response has no '{}' element",
                kind.list_api(),
                kind.list_key()
            ))
        })?;
        Ok(collection.children().to_vec())
    }

    /// Create one object.
    pub fn create(&self, kind: ObjectKind, args: &[(String, String)]) -> Result<()> {
        log::debug!("Calling {} with {} arguments", kind.create_api(), args.len());
        self.backend.create(kind, args)
    }

    /// Delete one object by name or path.
    pub fn delete(&self, kind: ObjectKind, target: &str) -> Result<()> {
        log::debug!("Calling {} for {target}", kind.delete_api());
        self.backend.delete(kind, target)
    }
}
