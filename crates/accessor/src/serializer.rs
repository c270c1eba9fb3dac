//! Entity ↔ JSON conversion
//!
//! Errors carry the entity type name and, for deserialization, the offending
//! payload. Size limits are checked after encoding so an oversized entity
//! never reaches the store.

use std::fmt;
use std::marker::PhantomData;
use viewbase_core::{Entity, Error, Limits, Result};

/// Canonical JSON codec for entity type `T`
pub struct JsonSerializer<T> {
    limits: Limits,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> JsonSerializer<T> {
    /// Create a serializer with default limits
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a serializer with custom limits
    pub fn with_limits(limits: Limits) -> Self {
        JsonSerializer {
            limits,
            _entity: PhantomData,
        }
    }

    /// Encode an entity as JSON text
    pub fn serialize(&self, entity: &T) -> Result<String> {
        let json = serde_json::to_string(entity).map_err(|e| Error::Serialization {
            type_name: T::NAME.to_string(),
            reason: e.to_string(),
        })?;
        self.limits.validate_document_size(&json)?;
        Ok(json)
    }

    /// Decode JSON text into an entity
    pub fn deserialize(&self, json: &str) -> Result<T> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization {
            type_name: T::NAME.to_string(),
            payload: json.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<T: Entity> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonSerializer<T> {
    fn clone(&self) -> Self {
        JsonSerializer {
            limits: self.limits.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for JsonSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSerializer")
            .field("limits", &self.limits)
            .finish()
    }
}
