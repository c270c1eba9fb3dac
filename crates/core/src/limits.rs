//! Size limits for keys and documents
//!
//! Defaults mirror the document store's own limits so that violations are
//! caught locally, before any remote call is issued.

use thiserror::Error;

/// Size limits for document keys and payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum full key length in bytes, namespace prefix included (default: 250)
    pub max_key_bytes: usize,

    /// Maximum serialized document size in bytes (default: 20MB)
    pub max_document_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_bytes: 250,
            max_document_bytes: 20 * 1024 * 1024, // 20MB
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_key_bytes: 32,
            max_document_bytes: 256,
        }
    }

    /// Validate a serialized document length
    pub fn validate_document_size(&self, json: &str) -> Result<(), LimitError> {
        let len = json.len();
        if len > self.max_document_bytes {
            return Err(LimitError::DocumentTooLarge {
                actual: len,
                max: self.max_document_bytes,
            });
        }
        Ok(())
    }
}

/// Limit violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Serialized document exceeds `max_document_bytes`
    #[error("document too large: {actual} bytes exceeds maximum {max}")]
    DocumentTooLarge {
        /// Actual size in bytes
        actual: usize,
        /// Maximum allowed size
        max: usize,
    },
}

impl From<LimitError> for crate::error::Error {
    fn from(e: LimitError) -> Self {
        match e {
            LimitError::DocumentTooLarge { actual, max } => {
                crate::error::Error::DocumentTooLarge { actual, max }
            }
        }
    }
}
