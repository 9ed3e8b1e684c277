//! Error types for checkpoint export, import, and recovery.

use std::fmt;
use std::io;

/// Convenience alias for fallible checkpoint/recovery operations.
pub type Result<T> = std::result::Result<T, RecoveryError>;

/// Errors raised while checkpointing a job or recovering one.
///
/// Two conditions are deliberately *not* errors: a missing storage
/// directory disables the subsystem (every operation becomes a no-op),
/// and a missing recovery pointer means "never checkpointed". Both are
/// reported through [`RecoverOutcome`](crate::recovery::RecoverOutcome)
/// instead, so corruption stays distinguishable from absence.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// The storage adapter failed a write, read, probe, or delete.
    #[error("storage error at {path}: {source}")]
    Io {
        /// Logical path the operation targeted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A metadata record exists but cannot be parsed.
    #[error("corrupt metadata at {path}: {reason}")]
    Corrupt {
        /// Logical path of the unreadable record.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A manifest entry carries a kind tag this build does not recognize.
    #[error("unknown reference kind `{kind}` for key `{key}`")]
    UnknownKind {
        /// Dependency key the entry describes.
        key: String,
        /// The unrecognized kind tag.
        kind: String,
    },
    /// An object-layer collaborator failed to export or restore an object.
    #[error("object `{key}`: {reason}")]
    Object {
        /// Key of the object involved.
        key: String,
        /// Collaborator diagnostic.
        reason: String,
    },
}

impl RecoveryError {
    /// Wrap an I/O error with the logical path it occurred at.
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Mark the record at `path` as unparseable.
    pub fn corrupt(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Report a collaborator failure for the object under `key`.
    pub fn object(key: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Object {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
