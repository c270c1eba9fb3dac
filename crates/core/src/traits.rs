//! Document store abstraction
//!
//! This module defines the [`DocumentStore`] trait: the boundary between
//! viewbase and a document-store driver. Accessors depend only on this trait,
//! so the embedded `MemoryStore` and a networked client are interchangeable.

use crate::design::DesignDocument;
use crate::error::StoreError;
use crate::query::{ViewQuery, ViewRow};
use std::sync::Arc;

/// Result type for store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Keyed JSON documents, a design-document catalog and view queries
///
/// Payloads are raw JSON text; the store never interprets entity types.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait DocumentStore: Send + Sync {
    /// Insert a new document
    ///
    /// # Errors
    ///
    /// `KeyExists` if a document is already stored at `key`.
    fn insert(&self, key: &str, json: &str) -> StoreResult<()>;

    /// Fetch a document's JSON, `None` if absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite an existing document
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if nothing is stored at `key`.
    fn replace(&self, key: &str, json: &str) -> StoreResult<()>;

    /// Insert or overwrite a document
    fn upsert(&self, key: &str, json: &str) -> StoreResult<()>;

    /// Remove a document
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if nothing is stored at `key`.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Fetch a design document by name, `None` if absent
    fn get_design_document(&self, name: &str) -> StoreResult<Option<DesignDocument>>;

    /// Create or fully replace a design document
    fn upsert_design_document(&self, doc: &DesignDocument) -> StoreResult<()>;

    /// List every design document in the catalog
    fn design_documents(&self) -> StoreResult<Vec<DesignDocument>>;

    /// Execute a view query, returning rows in index order
    fn query(&self, query: &ViewQuery) -> StoreResult<Vec<ViewRow>>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn insert(&self, key: &str, json: &str) -> StoreResult<()> {
        (**self).insert(key, json)
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn replace(&self, key: &str, json: &str) -> StoreResult<()> {
        (**self).replace(key, json)
    }

    fn upsert(&self, key: &str, json: &str) -> StoreResult<()> {
        (**self).upsert(key, json)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn get_design_document(&self, name: &str) -> StoreResult<Option<DesignDocument>> {
        (**self).get_design_document(name)
    }

    fn upsert_design_document(&self, doc: &DesignDocument) -> StoreResult<()> {
        (**self).upsert_design_document(doc)
    }

    fn design_documents(&self) -> StoreResult<Vec<DesignDocument>> {
        (**self).design_documents()
    }

    fn query(&self, query: &ViewQuery) -> StoreResult<Vec<ViewRow>> {
        (**self).query(query)
    }
}
