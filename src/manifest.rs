//! Reference kinds and the per-result dependency manifest.
//!
//! Every checkpointed result gets one manifest, stored at
//! `<resultKey>_references` in the checkpoint directory, mapping each
//! dependency key to the kind of routine needed to re-import it. The
//! manifest is rewritten wholesale on every export; the dependency set
//! is recomputed fresh each time, never merged.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RecoveryError, Result};
use crate::key::ObjectKey;
use crate::store::ObjectStore;

/// File name suffix of a result's reference manifest.
pub const REFERENCES_SUFFIX: &str = "_references";

/// How a dependency was persisted, and therefore how it must be
/// re-imported.
///
/// The enumeration is closed. Adding a kind means extending the export
/// arm and the import arm together; the wire tags below are the only
/// values a manifest may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A dataset-like object that owns its own multi-artifact export.
    LargeDataset,
    /// Any other keyed object, persisted as a single envelope artifact.
    GenericKeyedObject,
}

impl ReferenceKind {
    /// Stable wire tag recorded in manifests.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LargeDataset => "LargeDataset",
            Self::GenericKeyedObject => "GenericKeyedObject",
        }
    }

    /// Parse a wire tag; `None` for tags this build does not know.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "LargeDataset" => Some(Self::LargeDataset),
            "GenericKeyedObject" => Some(Self::GenericKeyedObject),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable mapping of each dependency key to its reference kind.
///
/// Entries are kept sorted by key so the serialized form is
/// deterministic. Kind tags stay raw strings until
/// [`typed_entries`](Self::typed_entries) parses them: an unknown tag
/// must surface as the version-skew error it is, not as a JSON parse
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceManifest {
    entries: BTreeMap<String, String>,
}

impl ReferenceManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record how the object under `key` was persisted.
    pub fn insert(&mut self, key: &ObjectKey, kind: ReferenceKind) {
        self.entries
            .insert(key.as_str().to_string(), kind.as_str().to_string());
    }

    /// Number of recorded dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest records no dependencies.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw kind tag recorded for `key`, if present.
    pub fn kind_of(&self, key: &ObjectKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    /// Raw `(key, tag)` entries in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, tag)| (key.as_str(), tag.as_str()))
    }

    /// Parse every entry into a `(key, kind)` pair.
    ///
    /// Fails on the first tag this build does not recognize. No entry is
    /// dispatched for import until the whole manifest parses, so version
    /// skew fails the import outright instead of a random prefix of it.
    pub fn typed_entries(&self) -> Result<Vec<(ObjectKey, ReferenceKind)>> {
        self.entries
            .iter()
            .map(|(key, tag)| match ReferenceKind::from_tag(tag) {
                Some(kind) => Ok((ObjectKey::new(key.clone()), kind)),
                None => Err(RecoveryError::UnknownKind {
                    key: key.clone(),
                    kind: tag.clone(),
                }),
            })
            .collect()
    }

    /// Serialize and atomically store the manifest at `path`.
    pub fn write_to(&self, store: &dyn ObjectStore, path: &str) -> Result<()> {
        let data =
            serde_json::to_vec_pretty(self).map_err(|e| RecoveryError::corrupt(path, e))?;
        store.write(path, &data)
    }

    /// Load the manifest stored at `path`.
    pub fn read_from(store: &dyn ObjectStore, path: &str) -> Result<Self> {
        let data = store.read(path)?;
        serde_json::from_slice(&data).map_err(|e| RecoveryError::corrupt(path, e))
    }
}

/// Path of the reference manifest for `result_key` inside `dir`.
pub fn references_path(dir: &str, result_key: &ObjectKey) -> String {
    format!("{dir}/{result_key}{REFERENCES_SUFFIX}")
}
