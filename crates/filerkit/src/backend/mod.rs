//! Backend abstraction for filer API operations.
//!
//! The [`Backend`] trait is the whole contract the reconciler needs from a
//! filer: enumerate one kind, create one object, delete one object.

pub mod file;
pub mod memory;

use crate::error::Result;
use crate::tree::ResponseTree;
use crate::types::ObjectKind;

/// Backend trait for filer operations.
///
/// This trait abstracts the transport, enabling:
/// - An in-memory filer for tests and dry rehearsals
/// - A JSON-file backed filer that keeps state between invocations
/// - Real API sessions living outside this crate
pub trait Backend: Send + Sync {
    /// Enumerate all objects of a kind in a single call.
    ///
    /// The returned tree holds the kind's list collection
    /// (see [`ObjectKind::list_key`]) as a direct child.
    fn list(&self, kind: ObjectKind) -> Result<ResponseTree>;

    /// Create one object. Argument order is preserved on the wire.
    fn create(&self, kind: ObjectKind, args: &[(String, String)]) -> Result<()>;

    /// Delete one object, addressed by name or by path where the API
    /// requires a composite one (e.g. `/vol/<volume>/<qtree>`).
    fn delete(&self, kind: ObjectKind, target: &str) -> Result<()>;
}

/// Look up a named argument in an ordered argument list.
pub fn arg<'a>(args: &'a [(String, String)], key: &str) -> Option<&'a str> {
    args.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
