//! Object key type shared by every checkpointable artifact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a checkpointable object.
///
/// Keys are opaque strings: two keys are the same object exactly when
/// their identity strings are equal. Within a checkpoint directory a key
/// doubles as the file name of the object's single-artifact export.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a key from any string-like identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the identity string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectKey {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_is_by_identity_string() {
        assert_eq!(ObjectKey::new("R1"), ObjectKey::from("R1"));
        assert_ne!(ObjectKey::new("R1"), ObjectKey::new("R2"));
    }

    #[test]
    fn test_key_ordering_and_display() {
        let mut keys = vec![ObjectKey::new("D2"), ObjectKey::new("D1")];
        keys.sort();
        assert_eq!(keys[0].to_string(), "D1");
        assert_eq!(keys[1].as_str(), "D2");
    }

    #[test]
    fn test_key_serializes_as_bare_string() {
        let json = serde_json::to_string(&ObjectKey::new("J1")).unwrap();
        assert_eq!(json, "\"J1\"");

        let key: ObjectKey = serde_json::from_str("\"J1\"").unwrap();
        assert_eq!(key, ObjectKey::new("J1"));
    }
}
