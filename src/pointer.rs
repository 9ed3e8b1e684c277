//! The recovery pointer: which job and result a checkpoint directory
//! belongs to.

use serde::{Deserialize, Serialize};

use crate::error::{RecoveryError, Result};
use crate::key::ObjectKey;
use crate::store::ObjectStore;

/// File name of the recovery pointer within a checkpoint directory.
pub const RECOVERY_META_FILE: &str = "recovery.json";

/// Top-level checkpoint descriptor.
///
/// Exactly one pointer exists per checkpoint directory; writing a new
/// one replaces the old. Its presence is what separates "there is
/// something to recover" from "never checkpointed", so it is always the
/// last record written in a checkpoint cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPointer {
    /// Type tag of the recoverable, used for resumption dispatch.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Key of the job that was driving the computation.
    #[serde(rename = "jobKey")]
    pub job_key: ObjectKey,
    /// Key of the result the directory checkpoints.
    #[serde(rename = "resultKey")]
    pub result_key: ObjectKey,
}

impl RecoveryPointer {
    /// Build a pointer for a result/job pair.
    pub fn new(class_name: impl Into<String>, job_key: ObjectKey, result_key: ObjectKey) -> Self {
        Self {
            class_name: class_name.into(),
            job_key,
            result_key,
        }
    }

    /// Serialize and atomically store the pointer at `path`.
    pub fn write_to(&self, store: &dyn ObjectStore, path: &str) -> Result<()> {
        let data =
            serde_json::to_vec_pretty(self).map_err(|e| RecoveryError::corrupt(path, e))?;
        store.write(path, &data)
    }

    /// Load the pointer stored at `path`.
    ///
    /// Returns `Ok(None)` when no pointer exists, meaning the directory
    /// was never checkpointed. An existing file that fails to parse is
    /// corrupt metadata and is never downgraded to "nothing to recover".
    pub fn read_from(store: &dyn ObjectStore, path: &str) -> Result<Option<Self>> {
        if !store.exists(path)? {
            return Ok(None);
        }
        let data = store.read(path)?;
        let pointer =
            serde_json::from_slice(&data).map_err(|e| RecoveryError::corrupt(path, e))?;
        Ok(Some(pointer))
    }
}

/// Path of the recovery pointer inside `dir`.
pub fn recovery_meta_path(dir: &str) -> String {
    format!("{dir}/{RECOVERY_META_FILE}")
}
