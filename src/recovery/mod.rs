//! Checkpoint lifecycle controller and restart-time recovery.
//!
//! One [`Recovery`] instance owns one job's checkpoint directory for
//! the job's lifetime. The job subsystem drives it through the
//! lifecycle calls ([`on_start`](Recovery::on_start),
//! [`on_update`](Recovery::on_update), [`on_done`](Recovery::on_done));
//! on process restart, [`auto_recover`](Recovery::auto_recover)
//! inspects the directory and hands resumable work to the routines in a
//! [`ResumeRegistry`].

mod references;
mod resume;

pub use resume::{ResumeFn, ResumeRegistry};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::artifact::{ArtifactTrail, CleanupReport};
use crate::config::GridsnapConfig;
use crate::error::Result;
use crate::key::ObjectKey;
use crate::pointer::{recovery_meta_path, RecoveryPointer};
use crate::recoverable::{ObjectCatalog, Recoverable};
use crate::store::ObjectStore;

/// What [`Recovery::auto_recover`] found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverOutcome {
    /// Recovery is disabled; nothing was attempted.
    NotConfigured,
    /// No recovery pointer in the directory; clean start.
    NoCheckpoint,
    /// A checkpoint was found and its resume routine completed.
    Resumed(RecoveryPointer),
    /// A checkpoint was found, but no routine is registered for its
    /// class tag.
    UnsupportedClass(String),
}

impl RecoverOutcome {
    /// True when a checkpointed job was resumed.
    pub fn is_resumed(&self) -> bool {
        matches!(self, Self::Resumed(_))
    }

    /// True when there was nothing to do (disabled, or no checkpoint).
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::NoCheckpoint)
    }
}

/// Checkpoint controller for a single job.
///
/// Bound to one checkpoint directory, which it owns exclusively for the
/// job's lifetime. Tracks every location it writes so completion can
/// clean up after itself. An empty directory string constructs the
/// disabled controller, whose every operation is a no-op.
pub struct Recovery {
    store: Arc<dyn ObjectStore>,
    catalog: Arc<dyn ObjectCatalog>,
    dir: Option<String>,
    written: ArtifactTrail,
}

impl Recovery {
    /// Create a controller writing checkpoints under `dir`.
    ///
    /// An empty `dir` disables the controller: checkpointing and
    /// recovery both become no-ops without touching storage.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        catalog: Arc<dyn ObjectCatalog>,
        dir: impl Into<String>,
    ) -> Self {
        let dir = dir.into();
        Self {
            store,
            catalog,
            dir: if dir.is_empty() { None } else { Some(dir) },
            written: ArtifactTrail::new(),
        }
    }

    /// Create a controller from the configured recovery directory.
    pub fn from_config(
        store: Arc<dyn ObjectStore>,
        catalog: Arc<dyn ObjectCatalog>,
        config: &GridsnapConfig,
    ) -> Self {
        let dir = config.recovery_dir().unwrap_or_default().to_string();
        Self::new(store, catalog, dir)
    }

    /// Whether checkpointing is enabled for this controller.
    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// The checkpoint directory, when enabled.
    pub fn storage_path(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    /// The storage adapter checkpoints go through.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// The live-object catalog used to resolve and restore references.
    pub fn catalog(&self) -> &Arc<dyn ObjectCatalog> {
        &self.catalog
    }

    /// Every location written so far, in first-write order.
    pub fn written_locations(&self) -> Vec<String> {
        self.written.snapshot()
    }

    /// Storage location of the single-artifact export for `key`, when
    /// enabled.
    pub fn artifact_path(&self, key: &ObjectKey) -> Option<String> {
        self.dir.as_deref().map(|dir| format!("{dir}/{key}"))
    }

    /// Persist the initial checkpoint for a starting job.
    ///
    /// Exports the result's own state in full, persists every
    /// resolvable dependency plus the reference manifest, and writes
    /// the recovery pointer last. A crash anywhere before the pointer
    /// write leaves the directory looking never-checkpointed.
    pub fn on_start(&self, result: &dyn Recoverable, job_key: &ObjectKey) -> Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        self.written
            .record_all(result.export_binary(self.store.as_ref(), dir, true)?);
        self.export_references(result)?;
        self.write_recovery_info(result, job_key)?;
        debug!(job = %job_key, result = %result.key(), "initial checkpoint written");
        Ok(())
    }

    /// Persist one newly completed sub-result and refresh the
    /// checkpoint around it.
    ///
    /// The sub-result artifact lands first, then the manifest is
    /// rebuilt from the current dependency set, then the result's own
    /// incremental export runs, so the top-level state never refers to
    /// a dependency that is not yet durable. Safe to call from multiple
    /// worker threads at once.
    pub fn on_update(&self, result: &dyn Recoverable, sub_result: &ObjectKey) -> Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        self.export_object(dir, sub_result)?;
        self.export_references(result)?;
        self.written
            .record_all(result.export_binary(self.store.as_ref(), dir, false)?);
        debug!(result = %result.key(), sub_result = %sub_result, "incremental checkpoint written");
        Ok(())
    }

    /// Delete every artifact this controller has written.
    ///
    /// Called when the job completes and its checkpoints are no longer
    /// needed. Deletion is best-effort: a failed delete is reported in
    /// the returned [`CleanupReport`] and the remaining deletions
    /// proceed.
    pub fn on_done(self) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.dir.is_none() {
            return report;
        }
        let locations = self.written.into_locations();
        report.attempted = locations.len();
        for location in locations {
            match self.store.delete(&location) {
                Ok(()) => report.deleted += 1,
                Err(err) => {
                    warn!(location = %location, error = %err, "failed to delete checkpoint artifact");
                    report.failed.push((location, err));
                }
            }
        }
        debug!(
            attempted = report.attempted,
            deleted = report.deleted,
            "checkpoint cleanup finished"
        );
        report
    }

    /// Inspect the checkpoint directory and resume whatever it points
    /// at.
    ///
    /// Absence of a pointer is the normal "nothing to recover" case.
    /// When one is found, the routine registered for its class tag runs
    /// with a fresh controller bound to the same directory, so resumed
    /// execution keeps checkpointing where the crashed run left off. A
    /// class tag with no registered routine is reported in the outcome
    /// rather than returned as an error, since unrelated startup work
    /// should continue.
    pub fn auto_recover(&self, registry: &ResumeRegistry) -> Result<RecoverOutcome> {
        let Some(dir) = self.dir.as_deref() else {
            debug!("auto recovery dir not configured");
            return Ok(RecoverOutcome::NotConfigured);
        };
        let meta_path = recovery_meta_path(dir);
        let Some(pointer) = RecoveryPointer::read_from(self.store.as_ref(), &meta_path)? else {
            debug!(path = %meta_path, "no recovery pointer found");
            return Ok(RecoverOutcome::NoCheckpoint);
        };
        info!(dir = %dir, class = %pointer.class_name, "initializing auto recovery");
        let Some(routine) = registry.get(&pointer.class_name) else {
            error!(class = %pointer.class_name, "unable to recover object of unregistered class");
            return Ok(RecoverOutcome::UnsupportedClass(pointer.class_name.clone()));
        };
        let resumed = Recovery::new(Arc::clone(&self.store), Arc::clone(&self.catalog), dir);
        routine(&pointer.job_key, &pointer.result_key, resumed)?;
        info!(job = %pointer.job_key, result = %pointer.result_key, "job resumed from checkpoint");
        Ok(RecoverOutcome::Resumed(pointer))
    }

    /// Persist the recovery pointer for `result` under this
    /// controller's directory.
    pub fn write_recovery_info(&self, result: &dyn Recoverable, job_key: &ObjectKey) -> Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        let pointer = RecoveryPointer::new(result.type_name(), job_key.clone(), result.key());
        let meta_path = recovery_meta_path(dir);
        pointer.write_to(self.store.as_ref(), &meta_path)?;
        self.written.record(meta_path);
        Ok(())
    }
}

impl fmt::Debug for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recovery")
            .field("dir", &self.dir)
            .field("written", &self.written.len())
            .finish_non_exhaustive()
    }
}
