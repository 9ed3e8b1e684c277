//! Capability contracts between the job subsystem and the controller.
//!
//! The controller never understands the objects it checkpoints. The job
//! subsystem hands it a [`Recoverable`] to drive a checkpoint cycle, an
//! [`ObjectCatalog`] to resolve and re-install dependency objects, and
//! per-object export routines through [`LargeDataset`] and
//! [`KeyedObject`]. Payload formats stay entirely on the caller's side
//! of these traits.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::key::ObjectKey;
use crate::manifest::ReferenceKind;
use crate::store::ObjectStore;

/// The contract a checkpointable job result must satisfy.
///
/// The controller holds a `Recoverable` only for the duration of one
/// checkpoint operation; it never persists the in-memory object itself.
pub trait Recoverable: Send + Sync {
    /// Identity of this result.
    fn key(&self) -> ObjectKey;

    /// Stable type tag recorded in the recovery pointer and used to
    /// look up the resume routine after a restart.
    fn type_name(&self) -> &'static str;

    /// Every object this result needs in order to be reconstructed
    /// (input datasets, partial models, ...), evaluated fresh on each
    /// call.
    fn dependent_keys(&self) -> BTreeSet<ObjectKey>;

    /// Export this result's own state into `dir`, returning every
    /// location written.
    ///
    /// `initial` is true for the full export at job start and false for
    /// the incremental exports that follow. Writes must go through
    /// `store` so they inherit its atomic-put semantics.
    fn export_binary(
        &self,
        store: &dyn ObjectStore,
        dir: &str,
        initial: bool,
    ) -> Result<Vec<String>>;
}

/// A dataset-like dependency that owns its own multi-artifact export.
pub trait LargeDataset: Send + Sync {
    /// Identity of the dataset.
    fn key(&self) -> ObjectKey;

    /// Export the dataset into `dir`, returning every location written.
    fn save_to(&self, store: &dyn ObjectStore, dir: &str) -> Result<Vec<String>>;
}

/// A generic keyed dependency persisted through the envelope writer.
pub trait KeyedObject: Send + Sync {
    /// Identity of the object.
    fn key(&self) -> ObjectKey;

    /// The object's opaque serialized form.
    fn payload(&self) -> Result<Vec<u8>>;
}

/// A resolved dependency, classified by how it must be persisted.
#[derive(Clone)]
pub enum Referenced {
    /// A large dataset with its own export routine.
    Dataset(Arc<dyn LargeDataset>),
    /// A generic keyed object.
    Keyed(Arc<dyn KeyedObject>),
}

impl Referenced {
    /// Key of the underlying object.
    pub fn key(&self) -> ObjectKey {
        match self {
            Self::Dataset(dataset) => dataset.key(),
            Self::Keyed(keyed) => keyed.key(),
        }
    }

    /// The reference kind this classification maps to.
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Dataset(_) => ReferenceKind::LargeDataset,
            Self::Keyed(_) => ReferenceKind::GenericKeyedObject,
        }
    }
}

impl fmt::Debug for Referenced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dataset(dataset) => write!(f, "Dataset({})", dataset.key()),
            Self::Keyed(keyed) => write!(f, "Keyed({})", keyed.key()),
        }
    }
}

/// The job subsystem's directory of live objects.
///
/// Export resolves dependency keys here; import installs reconstructed
/// objects back. `resolve` returning `None` means the object is absent
/// (collected or never materialized): the exporter skips it silently
/// and the manifest simply never mentions it.
pub trait ObjectCatalog: Send + Sync {
    /// Look up a live object by key.
    fn resolve(&self, key: &ObjectKey) -> Option<Referenced>;

    /// Rebuild a large dataset from the artifacts it exported into
    /// `dir` and install it under `key`.
    fn restore_dataset(&self, store: &dyn ObjectStore, dir: &str, key: &ObjectKey) -> Result<()>;

    /// Rebuild a generic keyed object from its stored payload and
    /// install it under `key`.
    fn restore_keyed(&self, key: &ObjectKey, payload: &[u8]) -> Result<()>;
}
