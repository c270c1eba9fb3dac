//! Accessor layer for viewbase
//!
//! This crate turns a `DocumentStore` into typed per-entity accessors:
//! - GenericAccessor: CRUD under namespaced keys plus finder dispatch
//! - ViewProvisioner: resolve-or-create of server-side views
//! - ViewCatalog: per-accessor finder → view cache
//! - JsonSerializer: entity ↔ JSON with size limits
//! - FinderExecutor: the dispatch capability application accessors wrap

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod catalog;
pub mod finder;
pub mod provisioner;
pub mod serializer;

pub use accessor::{AccessorOptions, GenericAccessor};
pub use catalog::ViewCatalog;
pub use finder::FinderExecutor;
pub use provisioner::{ProvisioningMode, ViewProvisioner};
pub use serializer::JsonSerializer;

pub use viewbase_core::{
    DocumentKey, DocumentStore, Entity, Error, FinderSet, FinderSpec, Limits, Result,
};
