//! In-memory document store
//!
//! `MemoryStore` implements [`DocumentStore`] entirely in process memory.
//! It is the embedded reference backend used by the test suites and by
//! applications that want view semantics without a server.
//!
//! # Design
//!
//! - DashMap: sharded document map, lock-free reads
//! - RwLock<BTreeMap>: design-document catalog, name ordered
//! - Views are computed on demand from the current documents, so every
//!   staleness option observes the latest writes
//! - AtomicU64 counters per operation, exposed through [`StoreStats`]
//! - An availability switch turns every call into `Unavailable`, for
//!   exercising failure paths
//!
//! Design documents are stored and returned by value; an upsert replaces the
//! whole document, exactly like the server catalog.

use crate::collation::collate;
use crate::mapfn::MapFunction;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, trace};
use viewbase_core::{
    DesignDocument, DocumentStore, StoreError, StoreResult, ViewQuery, ViewRow,
};

/// Number of recent queries retained for inspection
const QUERY_LOG_CAPACITY: usize = 64;

/// Snapshot of per-operation call counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// `get` calls
    pub gets: u64,
    /// `insert` calls
    pub inserts: u64,
    /// `replace` calls
    pub replaces: u64,
    /// `upsert` calls
    pub upserts: u64,
    /// `remove` calls
    pub removes: u64,
    /// `get_design_document` calls
    pub design_fetches: u64,
    /// `upsert_design_document` calls
    pub design_upserts: u64,
    /// `query` calls
    pub queries: u64,
}

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    inserts: AtomicU64,
    replaces: AtomicU64,
    upserts: AtomicU64,
    removes: AtomicU64,
    design_fetches: AtomicU64,
    design_upserts: AtomicU64,
    queries: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

/// Thread-safe in-memory [`DocumentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, String>,
    designs: RwLock<BTreeMap<String, DesignDocument>>,
    counters: Counters,
    unavailable: AtomicBool,
    query_log: Mutex<Vec<ViewQuery>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again) with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Current call counts
    pub fn stats(&self) -> StoreStats {
        let c = &self.counters;
        StoreStats {
            gets: c.gets.load(Ordering::Relaxed),
            inserts: c.inserts.load(Ordering::Relaxed),
            replaces: c.replaces.load(Ordering::Relaxed),
            upserts: c.upserts.load(Ordering::Relaxed),
            removes: c.removes.load(Ordering::Relaxed),
            design_fetches: c.design_fetches.load(Ordering::Relaxed),
            design_upserts: c.design_upserts.load(Ordering::Relaxed),
            queries: c.queries.load(Ordering::Relaxed),
        }
    }

    /// Most recent queries, oldest first
    pub fn recent_queries(&self) -> Vec<ViewQuery> {
        self.query_log.lock().clone()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if no documents are stored
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("store is unreachable"));
        }
        Ok(())
    }

    fn log_query(&self, query: &ViewQuery) {
        let mut log = self.query_log.lock();
        if log.len() == QUERY_LOG_CAPACITY {
            log.remove(0);
        }
        log.push(query.clone());
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, key: &str, json: &str) -> StoreResult<()> {
        bump(&self.counters.inserts);
        self.check_available()?;
        match self.documents.entry(key.to_string()) {
            Entry::Occupied(_) => Err(StoreError::KeyExists {
                key: key.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(json.to_string());
                trace!(target: "viewbase::store", key, "Inserted document");
                Ok(())
            }
        }
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        bump(&self.counters.gets);
        self.check_available()?;
        Ok(self.documents.get(key).map(|doc| doc.value().clone()))
    }

    fn replace(&self, key: &str, json: &str) -> StoreResult<()> {
        bump(&self.counters.replaces);
        self.check_available()?;
        match self.documents.get_mut(key) {
            Some(mut doc) => {
                *doc = json.to_string();
                trace!(target: "viewbase::store", key, "Replaced document");
                Ok(())
            }
            None => Err(StoreError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    fn upsert(&self, key: &str, json: &str) -> StoreResult<()> {
        bump(&self.counters.upserts);
        self.check_available()?;
        self.documents.insert(key.to_string(), json.to_string());
        trace!(target: "viewbase::store", key, "Upserted document");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        bump(&self.counters.removes);
        self.check_available()?;
        match self.documents.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    fn get_design_document(&self, name: &str) -> StoreResult<Option<DesignDocument>> {
        bump(&self.counters.design_fetches);
        self.check_available()?;
        Ok(self.designs.read().get(name).cloned())
    }

    fn upsert_design_document(&self, doc: &DesignDocument) -> StoreResult<()> {
        bump(&self.counters.design_upserts);
        self.check_available()?;
        self.designs.write().insert(doc.name.clone(), doc.clone());
        debug!(
            target: "viewbase::store",
            design = %doc.name,
            views = doc.views.len(),
            "Upserted design document"
        );
        Ok(())
    }

    fn design_documents(&self) -> StoreResult<Vec<DesignDocument>> {
        self.check_available()?;
        Ok(self.designs.read().values().cloned().collect())
    }

    fn query(&self, query: &ViewQuery) -> StoreResult<Vec<ViewRow>> {
        bump(&self.counters.queries);
        self.check_available()?;
        self.log_query(query);

        let map_source = {
            let designs = self.designs.read();
            let design = designs.get(query.design()).ok_or_else(|| {
                StoreError::unavailable(format!(
                    "not_found: design document '{}' does not exist",
                    query.design()
                ))
            })?;
            let view = design.view(query.view()).ok_or_else(|| {
                StoreError::unavailable(format!(
                    "not_found: view '{}' does not exist in '{}'",
                    query.view(),
                    query.design()
                ))
            })?;
            view.map.clone()
        };

        let map = MapFunction::compile(&map_source).map_err(|e| {
            StoreError::unavailable(format!(
                "view '{}/{}' failed to compile: {}",
                query.design(),
                query.view(),
                e
            ))
        })?;

        let mut rows = Vec::new();
        for entry in self.documents.iter() {
            // Non-JSON payloads are never indexed
            let Ok(doc) = serde_json::from_str::<JsonValue>(entry.value()) else {
                continue;
            };
            for (key, value) in map.apply(entry.key(), &doc) {
                rows.push(ViewRow {
                    id: entry.key().clone(),
                    key,
                    value,
                    document: Some(entry.value().clone()),
                });
            }
        }

        rows.sort_by(|a, b| collate(&a.key, &b.key).then_with(|| a.id.cmp(&b.id)));
        debug!(
            target: "viewbase::store",
            design = query.design(),
            view = query.view(),
            rows = rows.len(),
            "View query"
        );
        Ok(rows)
    }
}
