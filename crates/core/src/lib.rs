//! Core types and traits for viewbase
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error taxonomy (`Error`, `StoreError`)
//! - DocumentKey: Namespaced `<ENTITY>:<id>` keys with validation
//! - Limits: Key and document size limits
//! - Entity: Contract for stored application types
//! - FinderSpec / FinderSet: Declarative finder table
//! - DesignDocument / ViewDefinition: Server-side view catalog entries
//! - ViewQuery / ViewRow / Stale: View query types
//! - DocumentStore: The store driver boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod design;
pub mod entity;
pub mod error;
pub mod finder;
pub mod key;
pub mod limits;
pub mod query;
pub mod traits;

pub use design::{DesignDocument, ViewDefinition};
pub use entity::Entity;
pub use error::{Error, Result, StoreError};
pub use finder::{FinderSet, FinderSpec};
pub use key::{namespace_for, DocumentKey, KeyError};
pub use limits::{LimitError, Limits};
pub use query::{Stale, ViewQuery, ViewRow};
pub use traits::{DocumentStore, StoreResult};
