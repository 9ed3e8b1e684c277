//! Envelope encoding for generically persisted keyed objects.
//!
//! A generic dependency is stored as a single artifact holding the
//! object's key alongside its opaque payload. Carrying the key lets an
//! import verify it is restoring the object the manifest promised
//! before handing the payload back to the object layer.

use serde::{Deserialize, Serialize};

use crate::error::{RecoveryError, Result};
use crate::key::ObjectKey;

/// Binary envelope for one generically persisted object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    key: String,
    payload: Vec<u8>,
}

impl StoredObject {
    /// Wrap a payload under its object key.
    pub fn new(key: &ObjectKey, payload: Vec<u8>) -> Self {
        Self {
            key: key.as_str().to_string(),
            payload,
        }
    }

    /// Key the payload belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the envelope, returning the payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Encode the envelope for storage.
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| RecoveryError::object(self.key.clone(), format!("envelope encoding failed: {e}")))
    }

    /// Decode an envelope read from `path`.
    pub fn decode(data: &[u8], path: &str) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| RecoveryError::corrupt(path, e))
    }

    /// Decode an envelope read from `path` and confirm it belongs to
    /// `expected`.
    pub fn decode_for(data: &[u8], path: &str, expected: &ObjectKey) -> Result<Self> {
        let envelope = Self::decode(data, path)?;
        if envelope.key != expected.as_str() {
            return Err(RecoveryError::corrupt(
                path,
                format!(
                    "envelope key `{}` does not match manifest key `{expected}`",
                    envelope.key
                ),
            ));
        }
        Ok(envelope)
    }
}
