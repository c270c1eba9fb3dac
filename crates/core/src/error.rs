//! Error types for viewbase
//!
//! This module defines the error taxonomy surfaced by accessors and the
//! narrower [`StoreError`] reported by document store implementations.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! No error is retried or swallowed inside viewbase: every failure reaches
//! the immediate caller.

use crate::key::KeyError;
use thiserror::Error;

/// Result type alias for viewbase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by accessor, provisioning and session operations
///
/// # Categories
///
/// | Category | Variants |
/// |----------|----------|
/// | Existence | `NotFound`, `DuplicateKey` |
/// | Conversion | `Serialization`, `Deserialization`, `DocumentTooLarge` |
/// | Finder | `UnannotatedFinder`, `InvalidFinder` |
/// | Remote | `RemoteUnavailable` |
/// | Validation | `InvalidKey`, `Config` |
/// | Lifecycle | `SessionClosed`, `Internal` |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The operation required an existing document and none was found
    #[error("document not found: {key}")]
    NotFound {
        /// Full document key
        key: String,
    },

    /// `create` targeted an already-occupied key
    #[error("document already exists: {key}")]
    DuplicateKey {
        /// Full document key
        key: String,
    },

    /// Entity to JSON conversion failed
    #[error("cannot convert {type_name} to JSON: {reason}")]
    Serialization {
        /// Entity type name
        type_name: String,
        /// Underlying serializer message
        reason: String,
    },

    /// JSON to entity conversion failed
    #[error("cannot convert JSON {payload} to {type_name}: {reason}")]
    Deserialization {
        /// Entity type name
        type_name: String,
        /// The offending JSON payload
        payload: String,
        /// Underlying deserializer message
        reason: String,
    },

    /// Serialized entity exceeds the store's document size limit
    #[error("document too large: {actual} bytes exceeds maximum {max}")]
    DocumentTooLarge {
        /// Serialized size in bytes
        actual: usize,
        /// Maximum allowed size in bytes
        max: usize,
    },

    /// A finder was invoked that has no cached view
    #[error("method '{name}' is not declared as a finder")]
    UnannotatedFinder {
        /// Finder method name
        name: String,
    },

    /// A finder declaration was rejected
    #[error("invalid finder: {reason}")]
    InvalidFinder {
        /// Why the declaration was rejected
        reason: String,
    },

    /// The store catalog, keyed or query call failed for transport/server reasons
    #[error("document store unavailable: {reason}")]
    RemoteUnavailable {
        /// Reason reported by the store
        reason: String,
    },

    /// A caller-supplied id does not form a valid document key
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Configuration could not be read or parsed
    #[error("configuration error: {reason}")]
    Config {
        /// What went wrong
        reason: String,
    },

    /// The session was already stopped
    #[error("session closed")]
    SessionClosed,

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Create a `RemoteUnavailable` error
    pub fn remote(reason: impl Into<String>) -> Self {
        Error::RemoteUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a `Config` error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Create an `Internal` error
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for `DuplicateKey`
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Error::DuplicateKey { .. })
    }

    /// True for `RemoteUnavailable`
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Error::RemoteUnavailable { .. })
    }
}

/// Errors reported by a [`DocumentStore`](crate::traits::DocumentStore)
///
/// Existence conflicts are distinguishable from transport failures so the
/// accessor can map them onto `DuplicateKey` / `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Insert hit an occupied key
    #[error("key exists: {key}")]
    KeyExists {
        /// Full document key
        key: String,
    },

    /// Replace or remove hit an empty key
    #[error("key not found: {key}")]
    KeyNotFound {
        /// Full document key
        key: String,
    },

    /// Transport or server failure
    #[error("unavailable: {reason}")]
    Unavailable {
        /// Reason reported by the store
        reason: String,
    },
}

impl StoreError {
    /// Create an `Unavailable` error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::KeyExists { key } => Error::DuplicateKey { key },
            StoreError::KeyNotFound { key } => Error::NotFound { key },
            StoreError::Unavailable { reason } => Error::RemoteUnavailable { reason },
        }
    }
}
