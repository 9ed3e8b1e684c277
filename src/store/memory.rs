//! In-memory object store for tests and ephemeral runs.

use std::collections::HashMap;
use std::io;

use parking_lot::Mutex;

use crate::error::{RecoveryError, Result};
use crate::store::ObjectStore;

/// Object store backed by an in-memory map.
///
/// A map insert is the atomic put, so the adapter contract holds
/// trivially. Contents are inspectable, which is what lifecycle tests
/// use to assert exact checkpoint directory layouts.
#[derive(Debug, Default)]
pub struct MemStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// Contents of the object at `path`, if present.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(path).cloned()
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.objects.lock().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl ObjectStore for MemStore {
    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        self.objects.lock().insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.objects.lock().get(path).cloned().ok_or_else(|| {
            RecoveryError::io(path, io::Error::new(io::ErrorKind::NotFound, "no such object"))
        })
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.objects.lock().contains_key(path))
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.objects.lock().remove(path).map(|_| ()).ok_or_else(|| {
            RecoveryError::io(path, io::Error::new(io::ErrorKind::NotFound, "no such object"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let store = MemStore::new();
        assert!(store.is_empty());

        store.write("/ckpt/job1/R1", b"grid").unwrap();
        assert!(store.exists("/ckpt/job1/R1").unwrap());
        assert_eq!(store.read("/ckpt/job1/R1").unwrap(), b"grid");
        assert_eq!(store.len(), 1);

        store.delete("/ckpt/job1/R1").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_object_errors() {
        let store = MemStore::new();
        assert!(matches!(
            store.read("/absent").unwrap_err(),
            RecoveryError::Io { .. }
        ));
        assert!(matches!(
            store.delete("/absent").unwrap_err(),
            RecoveryError::Io { .. }
        ));
        assert!(!store.exists("/absent").unwrap());
    }

    #[test]
    fn test_paths_are_sorted() {
        let store = MemStore::new();
        store.write("/b", b"1").unwrap();
        store.write("/a", b"2").unwrap();
        assert_eq!(store.paths(), vec!["/a".to_string(), "/b".to_string()]);
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let store = MemStore::new();
        store.write("/a", b"old").unwrap();
        store.write("/a", b"new").unwrap();
        assert_eq!(store.get("/a").unwrap(), b"new");
        assert_eq!(store.len(), 1);
    }
}
