//! gridsnap - a checkpoint/recovery controller for resumable jobs
//!
//! Long-running jobs (hyperparameter searches, multi-stage training
//! runs) persist their state through a [`Recovery`] controller so that,
//! after a process crash or planned restart, the computation resumes
//! from the last known-good checkpoint instead of starting over:
//! - **Checkpoint lifecycle**: full export at job start, incremental
//!   exports as sub-results complete, cleanup on success
//! - **Reference tracking**: every object a result depends on is
//!   persisted alongside it, with a manifest describing how to
//!   re-import each one
//! - **Auto recovery**: on restart, a durable pointer record routes the
//!   checkpoint to the resume routine registered for its job type
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gridsnap::{Recovery, ResumeRegistry};
//!
//! // Wire a controller to the job's checkpoint directory
//! let recovery = Recovery::new(store, catalog, "/ckpt/job1");
//!
//! // Checkpoint while the job runs
//! recovery.on_start(&grid, &job_key)?;
//! recovery.on_update(&grid, &model_key)?;
//! recovery.on_done();
//!
//! // On process restart
//! let outcome = recovery.auto_recover(&registry)?;
//! ```

#![warn(missing_docs)]

pub mod artifact;
pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod manifest;
pub mod pointer;
pub mod recoverable;
pub mod recovery;
pub mod store;

// Re-exports for convenience
pub use artifact::{ArtifactTrail, CleanupReport};
pub use error::{RecoveryError, Result};
pub use key::ObjectKey;
pub use manifest::{ReferenceKind, ReferenceManifest};
pub use pointer::RecoveryPointer;
pub use recoverable::{KeyedObject, LargeDataset, ObjectCatalog, Recoverable, Referenced};
pub use recovery::{RecoverOutcome, Recovery, ResumeRegistry};
pub use store::{LocalStore, MemStore, ObjectStore};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{RecoveryError, Result};
    pub use crate::key::ObjectKey;
    pub use crate::recoverable::{
        KeyedObject, LargeDataset, ObjectCatalog, Recoverable, Referenced,
    };
    pub use crate::recovery::{RecoverOutcome, Recovery, ResumeRegistry};
    pub use crate::store::{LocalStore, MemStore, ObjectStore};
}
