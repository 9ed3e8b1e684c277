//! Dependency export and import for checkpointed results.

use std::thread;

use crossbeam::channel;
use tracing::debug;

use crate::codec::StoredObject;
use crate::error::{RecoveryError, Result};
use crate::key::ObjectKey;
use crate::manifest::{references_path, ReferenceKind, ReferenceManifest};
use crate::recoverable::{Recoverable, Referenced};

use super::Recovery;

impl Recovery {
    /// Persist every resolvable dependency of `result`, plus the
    /// manifest describing how to re-import them.
    ///
    /// The manifest is rebuilt from scratch on every call; dependencies
    /// that no longer resolve simply drop out of it. A key that
    /// resolves to nothing is skipped silently, the object is assumed
    /// collected. The manifest write lands after the per-object
    /// artifacts, so a manifest never names an object whose artifact is
    /// not durable.
    pub fn export_references(&self, result: &dyn Recoverable) -> Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        let mut manifest = ReferenceManifest::new();
        for key in result.dependent_keys() {
            let Some(object) = self.catalog.resolve(&key) else {
                continue;
            };
            self.export_resolved(dir, &object)?;
            manifest.insert(&key, object.kind());
        }
        let manifest_path = references_path(dir, &result.key());
        manifest.write_to(self.store.as_ref(), &manifest_path)?;
        self.written.record(manifest_path);
        debug!(result = %result.key(), references = manifest.len(), "reference manifest written");
        Ok(())
    }

    /// Re-import every dependency listed in `result`'s manifest.
    ///
    /// Kind tags are validated up front, so an unknown tag fails the
    /// whole import before any entry is dispatched. Entries then import
    /// on scoped worker threads; the call blocks until every worker has
    /// finished and returns the first failure, if any.
    pub fn load_references(&self, result: &dyn Recoverable) -> Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        let manifest_path = references_path(dir, &result.key());
        let manifest = ReferenceManifest::read_from(self.store.as_ref(), &manifest_path)?;
        let entries = manifest.typed_entries()?;
        debug!(result = %result.key(), references = entries.len(), "importing references");

        let (tx, rx) = channel::unbounded();
        thread::scope(|scope| {
            for (key, kind) in &entries {
                let tx = tx.clone();
                scope.spawn(move || {
                    let _ = tx.send(self.import_reference(dir, key, *kind));
                });
            }
        });
        drop(tx);
        for outcome in rx {
            outcome?;
        }
        Ok(())
    }

    /// Export the single object `sub_result` currently resolves to.
    ///
    /// Unlike a plain dependency walk, the object must exist: the
    /// caller is announcing a freshly produced result, so failure to
    /// resolve it is an error rather than a skip.
    pub(super) fn export_object(&self, dir: &str, sub_result: &ObjectKey) -> Result<()> {
        let Some(object) = self.catalog.resolve(sub_result) else {
            return Err(RecoveryError::object(
                sub_result.as_str(),
                "not resolvable in the object catalog",
            ));
        };
        self.export_resolved(dir, &object)
    }

    fn export_resolved(&self, dir: &str, object: &Referenced) -> Result<()> {
        match object {
            Referenced::Dataset(dataset) => {
                self.written
                    .record_all(dataset.save_to(self.store.as_ref(), dir)?);
            }
            Referenced::Keyed(keyed) => {
                let key = keyed.key();
                let envelope = StoredObject::new(&key, keyed.payload()?);
                let path = format!("{dir}/{key}");
                self.store.write(&path, &envelope.encode()?)?;
                self.written.record(path);
            }
        }
        Ok(())
    }

    fn import_reference(&self, dir: &str, key: &ObjectKey, kind: ReferenceKind) -> Result<()> {
        match kind {
            ReferenceKind::LargeDataset => {
                self.catalog.restore_dataset(self.store.as_ref(), dir, key)
            }
            ReferenceKind::GenericKeyedObject => {
                let path = format!("{dir}/{key}");
                let data = self.store.read(&path)?;
                let envelope = StoredObject::decode_for(&data, &path, key)?;
                self.catalog.restore_keyed(key, envelope.payload())
            }
        }
    }
}
