//! Shared test utilities for the end-to-end suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};
use viewbase::{Entity, FinderSet, FinderSpec, MemoryStore, Session, ViewbaseConfig};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a fmt subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub owner: String,
    pub status: String,
    pub balance: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entity for Account {
    const NAME: &'static str = "Account";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub account: String,
    pub amount: i64,
    pub settled: bool,
}

impl Entity for Invoice {
    const NAME: &'static str = "Invoice";
}

pub fn account(owner: &str, status: &str, balance: i64) -> Account {
    Account {
        owner: owner.to_string(),
        status: status.to_string(),
        balance,
        tags: Vec::new(),
    }
}

pub fn account_finders() -> FinderSet {
    FinderSet::new()
        .with(
            "findByStatus",
            FinderSpec::new("doc.status == \"ACTIVE\"", "emit(meta.id, null)"),
        )
        .unwrap()
        .with(
            "findOverdrawn",
            FinderSpec::new("doc.balance < 0", "emit(doc.balance, doc.owner)"),
        )
        .unwrap()
}

pub fn invoice_finders() -> FinderSet {
    FinderSet::new()
        .with(
            "findUnsettled",
            FinderSpec::new("doc.settled === false", "emit(doc.account, doc.amount)"),
        )
        .unwrap()
}

// ============================================================================
// TestSession
// ============================================================================

/// A started session over a fresh in-memory store
pub struct TestSession {
    pub store: Arc<MemoryStore>,
    pub session: Session,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_config(quick_config())
    }

    pub fn with_config(config: ViewbaseConfig) -> Self {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let session = Session::start(config, store.clone()).unwrap();
        TestSession { store, session }
    }
}

/// Default config without the warm-up hold
pub fn quick_config() -> ViewbaseConfig {
    ViewbaseConfig {
        warm_up_ms: 0,
        ..ViewbaseConfig::default()
    }
}
