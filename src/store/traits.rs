//! Storage adapter contract consumed by the recovery controller.

use crate::error::Result;

/// Byte-addressable object storage over a logical path namespace.
///
/// Implementations map logical paths onto a backing medium: the local
/// filesystem, an object store, an in-memory map. The controller never
/// assumes anything about path structure beyond `/` as the separator it
/// uses when composing paths inside a checkpoint directory.
///
/// `write` must be an atomic put: a reader racing with a write observes
/// either the previous complete object or the new complete object,
/// never a torn one. Everything else in the crate's crash-consistency
/// story (pointer written last, manifests replaced wholesale) builds on
/// that single primitive.
pub trait ObjectStore: Send + Sync {
    /// Atomically write `data` at `path`, replacing any existing object.
    fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read the complete object at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Whether an object exists at `path`.
    fn exists(&self, path: &str) -> Result<bool>;

    /// Delete the object at `path`.
    fn delete(&self, path: &str) -> Result<()>;
}
