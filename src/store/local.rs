//! Filesystem-backed object store.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{RecoveryError, Result};
use crate::store::ObjectStore;

/// Object store backed by the local filesystem.
///
/// Logical paths are used directly as filesystem paths. A write goes to
/// a hidden temp file next to the destination, is synced, and is then
/// renamed over the destination, so a concurrent reader never observes
/// a partial object. Parent directories are created on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    /// Create a filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl ObjectStore for LocalStore {
    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = Path::new(path);
        let parent = target.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|e| RecoveryError::io(path, e))?;
        }

        let file_name = target.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            RecoveryError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
        let tmp_name = format!(".{file_name}.tmp.{}", Uuid::new_v4().simple());
        let tmp_path = match parent {
            Some(parent) => parent.join(&tmp_name),
            None => PathBuf::from(&tmp_name),
        };

        let write_tmp = || -> io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
            fs::rename(&tmp_path, target)
        };
        write_tmp().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            RecoveryError::io(path, e)
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| RecoveryError::io(path, e))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(Path::new(path).exists())
    }

    fn delete(&self, path: &str) -> Result<()> {
        fs::remove_file(path).map_err(|e| RecoveryError::io(path, e))
    }
}
