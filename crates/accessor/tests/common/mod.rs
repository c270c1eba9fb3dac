//! Shared fixtures for the accessor integration suites.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use viewbase_accessor::{Entity, FinderSet, FinderSpec, GenericAccessor};
use viewbase_storage::MemoryStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub status: String,
    pub age: u32,
}

impl Entity for User {
    const NAME: &'static str = "User";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub total: u64,
    pub paid: bool,
}

impl Entity for Order {
    const NAME: &'static str = "Order";
}

pub fn user(name: &str, status: &str, age: u32) -> User {
    User {
        name: name.to_string(),
        status: status.to_string(),
        age,
    }
}

/// `findByStatus` as declared in the accessor documentation
pub fn find_by_status() -> FinderSpec {
    FinderSpec::new("doc.status == \"ACTIVE\"", "emit(meta.id, null)")
}

pub fn user_finders() -> FinderSet {
    FinderSet::new()
        .with("findByStatus", find_by_status())
        .unwrap()
        .with(
            "findAdults",
            FinderSpec::new("doc.age >= 18", "emit(doc.age, doc.name)"),
        )
        .unwrap()
}

pub fn user_accessor() -> (Arc<MemoryStore>, GenericAccessor<User>) {
    let store = Arc::new(MemoryStore::new());
    let accessor = GenericAccessor::new(store.clone(), user_finders());
    (store, accessor)
}
