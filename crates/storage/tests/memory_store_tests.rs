//! MemoryStore integration tests
//!
//! Concurrent access to documents and the design-document catalog, and view
//! queries over larger document sets.

use std::sync::{Arc, Barrier};
use std::thread;
use viewbase_core::{
    DesignDocument, DocumentStore, FinderSpec, Stale, StoreError, ViewDefinition, ViewQuery,
};
use viewbase_storage::MemoryStore;

fn status_view() -> DesignDocument {
    let spec = FinderSpec::new("doc.status == \"ACTIVE\"", "emit(doc.rank, null)");
    DesignDocument::new("ITEM", vec![ViewDefinition::from_finder("active", &spec)])
}

// ============================================================================
// Concurrent document access
// ============================================================================

#[test]
fn test_concurrent_inserts_on_same_key_admit_exactly_one() {
    let store = Arc::new(MemoryStore::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.insert("ITEM:contended", &format!("{{\"writer\":{}}}", i))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, StoreError::KeyExists { .. })));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_writers_on_distinct_keys() {
    let store = Arc::new(MemoryStore::new());
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..250 {
                    let key = format!("ITEM:{}-{}", t, i);
                    store.upsert(&key, "{\"status\":\"ACTIVE\"}").unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.len(), 1000);
    assert_eq!(store.stats().upserts, 1000);
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_view_over_many_documents_is_sorted_by_key() {
    let store = MemoryStore::new();
    store.upsert_design_document(&status_view()).unwrap();
    for i in 0..500 {
        let status = if i % 5 == 0 { "ACTIVE" } else { "IDLE" };
        store
            .upsert(
                &format!("ITEM:{}", i),
                &format!("{{\"status\":\"{}\",\"rank\":{}}}", status, 1000 - i),
            )
            .unwrap();
    }

    let rows = store
        .query(&ViewQuery::new("ITEM", "active").stale(Stale::False))
        .unwrap();
    assert_eq!(rows.len(), 100);
    let ranks: Vec<i64> = rows.iter().map(|r| r.key.as_i64().unwrap()).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);
    assert!(rows.iter().all(|r| r.document.is_some()));
}

#[test]
fn test_queries_during_writes_never_fail() {
    let store = Arc::new(MemoryStore::new());
    store.upsert_design_document(&status_view()).unwrap();
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..200 {
                store
                    .upsert(
                        &format!("ITEM:{}", i),
                        &format!("{{\"status\":\"ACTIVE\",\"rank\":{}}}", i),
                    )
                    .unwrap();
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let mut last = 0;
            for _ in 0..50 {
                let rows = store.query(&ViewQuery::new("ITEM", "active")).unwrap();
                assert!(rows.len() <= 200);
                last = rows.len();
            }
            last
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    let rows = store.query(&ViewQuery::new("ITEM", "active")).unwrap();
    assert_eq!(rows.len(), 200);
}

#[test]
fn test_design_upsert_replaces_whole_document() {
    let store = MemoryStore::new();
    store.upsert_design_document(&status_view()).unwrap();
    store
        .upsert_design_document(&DesignDocument::new(
            "ITEM",
            vec![ViewDefinition::new(
                "other",
                "function (doc, meta) { emit(meta.id, null); }",
            )],
        ))
        .unwrap();

    let doc = store.get_design_document("ITEM").unwrap().unwrap();
    assert!(doc.view("active").is_none());
    assert!(doc.view("other").is_some());
    assert!(matches!(
        store.query(&ViewQuery::new("ITEM", "active")),
        Err(StoreError::Unavailable { .. })
    ));
}
