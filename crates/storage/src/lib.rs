//! Storage layer for viewbase
//!
//! This crate implements the embedded document store:
//! - MemoryStore: DashMap documents + RwLock design-document catalog
//! - MapFunction: interpreter for the map-function subset views use
//! - collate: view key ordering
//! - StoreStats: per-operation call counters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collation;
pub mod mapfn;
pub mod memory;

pub use collation::collate;
pub use mapfn::{MapError, MapFunction};
pub use memory::{MemoryStore, StoreStats};
