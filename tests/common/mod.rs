//! Shared fixtures for checkpoint lifecycle and fault injection tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use gridsnap::{
    KeyedObject, LargeDataset, ObjectCatalog, ObjectKey, ObjectStore, Recoverable, RecoveryError,
    Referenced, Result,
};

/// A checkpointable result standing in for a grid-search job's output.
///
/// Its dependency set is mutable so tests can model sub-results being
/// produced while the job runs.
pub struct TestGrid {
    key: ObjectKey,
    deps: Mutex<BTreeSet<ObjectKey>>,
}

impl TestGrid {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: ObjectKey::new(key),
            deps: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn add_dep(&self, key: &ObjectKey) {
        self.deps.lock().insert(key.clone());
    }

    pub fn set_deps<I>(&self, keys: I)
    where
        I: IntoIterator<Item = ObjectKey>,
    {
        *self.deps.lock() = keys.into_iter().collect();
    }
}

impl Recoverable for TestGrid {
    fn key(&self) -> ObjectKey {
        self.key.clone()
    }

    fn type_name(&self) -> &'static str {
        "Grid"
    }

    fn dependent_keys(&self) -> BTreeSet<ObjectKey> {
        self.deps.lock().clone()
    }

    fn export_binary(
        &self,
        store: &dyn ObjectStore,
        dir: &str,
        initial: bool,
    ) -> Result<Vec<String>> {
        let path = format!("{dir}/{}", self.key);
        let mut body = format!("grid:{}:initial={initial}", self.key);
        for dep in self.deps.lock().iter() {
            body.push(':');
            body.push_str(dep.as_str());
        }
        store.write(&path, body.as_bytes())?;
        Ok(vec![path])
    }
}

/// A dataset fixture that exports two artifacts, data plus metadata.
pub struct TestFrame {
    key: ObjectKey,
    rows: Vec<u8>,
}

impl TestFrame {
    pub fn new(key: impl Into<String>, rows: Vec<u8>) -> Self {
        Self {
            key: ObjectKey::new(key),
            rows,
        }
    }

    pub fn rows(&self) -> &[u8] {
        &self.rows
    }
}

impl LargeDataset for TestFrame {
    fn key(&self) -> ObjectKey {
        self.key.clone()
    }

    fn save_to(&self, store: &dyn ObjectStore, dir: &str) -> Result<Vec<String>> {
        let data_path = format!("{dir}/{}", self.key);
        let meta_path = format!("{data_path}.meta");
        store.write(&data_path, &self.rows)?;
        store.write(&meta_path, format!("rows={}", self.rows.len()).as_bytes())?;
        Ok(vec![data_path, meta_path])
    }
}

/// A generic keyed fixture with an opaque payload.
pub struct TestModel {
    key: ObjectKey,
    payload: Vec<u8>,
}

impl TestModel {
    pub fn new(key: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            key: ObjectKey::new(key),
            payload,
        }
    }
}

impl KeyedObject for TestModel {
    fn key(&self) -> ObjectKey {
        self.key.clone()
    }

    fn payload(&self) -> Result<Vec<u8>> {
        Ok(self.payload.clone())
    }
}

/// A map-backed object catalog that also records what import installs,
/// so tests can assert exactly which objects were reconstructed.
#[derive(Default)]
pub struct TestCatalog {
    objects: Mutex<HashMap<ObjectKey, Referenced>>,
    restored_datasets: Mutex<Vec<ObjectKey>>,
    restored_keyed: Mutex<HashMap<ObjectKey, Vec<u8>>>,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_frame(&self, frame: TestFrame) -> ObjectKey {
        let key = LargeDataset::key(&frame);
        self.objects
            .lock()
            .insert(key.clone(), Referenced::Dataset(Arc::new(frame)));
        key
    }

    pub fn insert_model(&self, model: TestModel) -> ObjectKey {
        let key = KeyedObject::key(&model);
        self.objects
            .lock()
            .insert(key.clone(), Referenced::Keyed(Arc::new(model)));
        key
    }

    pub fn remove(&self, key: &ObjectKey) {
        self.objects.lock().remove(key);
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.lock().contains_key(key)
    }

    /// Keys of datasets installed by `restore_dataset`, in call order.
    pub fn restored_datasets(&self) -> Vec<ObjectKey> {
        self.restored_datasets.lock().clone()
    }

    /// Payload installed for `key` by `restore_keyed`, if any.
    pub fn restored_keyed(&self, key: &ObjectKey) -> Option<Vec<u8>> {
        self.restored_keyed.lock().get(key).cloned()
    }

    /// Total number of objects installed by either restore routine.
    pub fn restored_count(&self) -> usize {
        self.restored_datasets.lock().len() + self.restored_keyed.lock().len()
    }
}

impl ObjectCatalog for TestCatalog {
    fn resolve(&self, key: &ObjectKey) -> Option<Referenced> {
        self.objects.lock().get(key).cloned()
    }

    fn restore_dataset(&self, store: &dyn ObjectStore, dir: &str, key: &ObjectKey) -> Result<()> {
        let data = store.read(&format!("{dir}/{key}"))?;
        let frame = TestFrame::new(key.as_str(), data);
        self.objects
            .lock()
            .insert(key.clone(), Referenced::Dataset(Arc::new(frame)));
        self.restored_datasets.lock().push(key.clone());
        Ok(())
    }

    fn restore_keyed(&self, key: &ObjectKey, payload: &[u8]) -> Result<()> {
        let model = TestModel::new(key.as_str(), payload.to_vec());
        self.objects
            .lock()
            .insert(key.clone(), Referenced::Keyed(Arc::new(model)));
        self.restored_keyed
            .lock()
            .insert(key.clone(), payload.to_vec());
        Ok(())
    }
}

/// A fault-injection wrapper around any `ObjectStore`.
///
/// Allows deterministic injection of:
/// - write errors at a specific operation count
/// - delete errors for a chosen path
///
/// and records every operation so tests can assert exact storage
/// traffic.
pub struct FaultStore<S> {
    inner: S,
    /// Total number of write calls observed so far.
    write_count: AtomicU64,
    /// Total number of store calls of any kind observed so far.
    op_count: AtomicU64,
    /// When non-zero, the Nth write (1-based) will return an I/O error.
    fail_write_at: AtomicU64,
    /// When set, deleting exactly this path will return an I/O error.
    fail_delete_of: Mutex<Option<String>>,
    /// Every path passed to delete, in call order.
    deletes: Mutex<Vec<String>>,
}

impl<S: ObjectStore> FaultStore<S> {
    /// Wrap an existing store for fault injection.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            write_count: AtomicU64::new(0),
            op_count: AtomicU64::new(0),
            fail_write_at: AtomicU64::new(0),
            fail_delete_of: Mutex::new(None),
            deletes: Mutex::new(Vec::new()),
        }
    }

    /// Make the Nth write (1-based) return an I/O error.
    pub fn inject_write_error_at(&self, operation_n: u64) {
        self.fail_write_at.store(operation_n, Ordering::SeqCst);
    }

    /// Make every delete of exactly `path` return an I/O error.
    pub fn fail_delete_of(&self, path: impl Into<String>) {
        *self.fail_delete_of.lock() = Some(path.into());
    }

    /// Return the total number of write calls observed.
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Return the total number of store calls of any kind observed.
    pub fn op_count(&self) -> u64 {
        self.op_count.load(Ordering::SeqCst)
    }

    /// Every path passed to delete so far, in call order.
    pub fn deleted_paths(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }

    /// Access the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ObjectStore> ObjectStore for FaultStore<S> {
    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let n = self.write_count.fetch_add(1, Ordering::SeqCst) + 1;

        let target = self.fail_write_at.load(Ordering::SeqCst);
        if target != 0 && n == target {
            return Err(RecoveryError::io(
                path,
                io::Error::other(format!("injected write error at operation {n}")),
            ));
        }

        self.inner.write(path, data)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        self.inner.read(path)
    }

    fn exists(&self, path: &str) -> Result<bool> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(path)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        self.deletes.lock().push(path.to_string());

        if self.fail_delete_of.lock().as_deref() == Some(path) {
            return Err(RecoveryError::io(
                path,
                io::Error::other("injected delete error"),
            ));
        }

        self.inner.delete(path)
    }
}
