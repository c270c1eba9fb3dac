//! End-to-end Tests
//!
//! Session, accessors and finders wired together over the in-memory store:
//! - lifecycle: config file → session → accessors → stop
//! - finders: provisioning and dispatch across several entity types
//! - properties: randomized CRUD round trips

#[path = "../common/mod.rs"]
mod common;

mod finders;
mod lifecycle;
mod properties;
