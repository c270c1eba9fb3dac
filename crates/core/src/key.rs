//! Document keys
//!
//! Every document written by an accessor lives at `<NAMESPACE>:<id>` where
//! `NAMESPACE` is the entity's type name uppercased. The same namespace names
//! the entity's design document.
//!
//! ## Contract
//!
//! - Any id is accepted, including the empty string
//! - The full key must not exceed `max_key_bytes` (default: 250)
//! - Entity names must not be empty
//!
//! Because the namespace prefix is part of the key, entities of different
//! types never collide, even with identical ids.

use crate::entity::Entity;
use crate::limits::Limits;
use std::fmt;
use thiserror::Error;

/// Separator between namespace and id
pub const KEY_SEPARATOR: char = ':';

/// Derive the key namespace (and design document name) from an entity name
///
/// # Examples
///
/// ```
/// use viewbase_core::key::namespace_for;
///
/// assert_eq!(namespace_for("User"), "USER");
/// assert_eq!(namespace_for("orderLine"), "ORDERLINE");
/// ```
pub fn namespace_for(entity_name: &str) -> String {
    entity_name.to_uppercase()
}

/// A validated, namespaced document key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    namespace: String,
    id: String,
}

impl DocumentKey {
    /// Build a key for `entity_name` and `id` using default limits
    ///
    /// # Examples
    ///
    /// ```
    /// use viewbase_core::DocumentKey;
    ///
    /// let key = DocumentKey::new("User", "42").unwrap();
    /// assert_eq!(key.to_string(), "USER:42");
    ///
    /// assert_eq!(DocumentKey::new("User", "").unwrap().to_string(), "USER:");
    /// ```
    pub fn new(entity_name: &str, id: &str) -> Result<Self, KeyError> {
        Self::with_limits(entity_name, id, &Limits::default())
    }

    /// Build a key with custom limits
    pub fn with_limits(entity_name: &str, id: &str, limits: &Limits) -> Result<Self, KeyError> {
        if entity_name.is_empty() {
            return Err(KeyError::EmptyEntityName);
        }
        let namespace = namespace_for(entity_name);
        validate_id(&namespace, id, limits)?;
        Ok(DocumentKey {
            namespace,
            id: id.to_string(),
        })
    }

    /// Build a key for entity type `T`
    pub fn for_entity<T: Entity>(id: &str) -> Result<Self, KeyError> {
        Self::new(T::NAME, id)
    }

    /// Uppercased entity name
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Caller-supplied id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full key length in bytes
    pub fn len(&self) -> usize {
        self.namespace.len() + KEY_SEPARATOR.len_utf8() + self.id.len()
    }

    /// Keys always carry a namespace, so this is never true
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, KEY_SEPARATOR, self.id)
    }
}

/// Validate an id within a namespace
pub fn validate_id(namespace: &str, id: &str, limits: &Limits) -> Result<(), KeyError> {
    let len = namespace.len() + KEY_SEPARATOR.len_utf8() + id.len();
    if len > limits.max_key_bytes {
        return Err(KeyError::TooLong {
            actual: len,
            max: limits.max_key_bytes,
        });
    }

    Ok(())
}

/// Key validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Entity name is empty
    #[error("Entity name cannot be empty")]
    EmptyEntityName,

    /// Full key exceeds maximum length
    #[error("Key too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual key length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },
}
