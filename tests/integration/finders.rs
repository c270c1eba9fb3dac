//! Finder provisioning and dispatch across entity types

use crate::common::*;
use serde_json::json;
use viewbase::{DocumentStore, Error, FinderExecutor, GenericAccessor, Stale};

#[test]
fn test_each_entity_gets_its_own_design_document() {
    let t = TestSession::new();
    t.session.accessor::<Account>(account_finders()).unwrap();
    t.session.accessor::<Invoice>(invoice_finders()).unwrap();

    let docs = t.store.design_documents().unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["ACCOUNT", "INVOICE"]);
    assert_eq!(docs[0].len(), 2);
    assert_eq!(docs[1].len(), 1);
    t.session.stop().unwrap();
}

#[test]
fn test_second_session_reuses_existing_views() {
    let t = TestSession::new();
    t.session.accessor::<Account>(account_finders()).unwrap();
    let upserts = t.store.stats().design_upserts;

    let again = t.session.accessor::<Account>(account_finders()).unwrap();
    assert_eq!(again.cached_finders().len(), 2);
    assert_eq!(t.store.stats().design_upserts, upserts);
    t.session.stop().unwrap();
}

#[test]
fn test_finders_filter_and_order_results() {
    let t = TestSession::new();
    let accounts = t.session.accessor::<Account>(account_finders()).unwrap();
    accounts.set("1", &account("ada", "ACTIVE", -5)).unwrap();
    accounts.set("2", &account("bob", "FROZEN", -50)).unwrap();
    accounts.set("3", &account("cy", "ACTIVE", 10)).unwrap();

    let active: Vec<String> = accounts
        .invoke_finder("findByStatus", &[])
        .unwrap()
        .into_iter()
        .map(|a| a.owner)
        .collect();
    assert_eq!(active, vec!["ada", "cy"]);

    let overdrawn: Vec<String> = accounts
        .invoke_finder("findOverdrawn", &[])
        .unwrap()
        .into_iter()
        .map(|a| a.owner)
        .collect();
    assert_eq!(overdrawn, vec!["bob", "ada"]);
    t.session.stop().unwrap();
}

#[test]
fn test_views_only_index_matching_documents() {
    let t = TestSession::new();
    let accounts = t.session.accessor::<Account>(account_finders()).unwrap();
    let invoices = t.session.accessor::<Invoice>(invoice_finders()).unwrap();

    accounts.set("1", &account("ada", "ACTIVE", 3)).unwrap();
    invoices
        .set(
            "i1",
            &Invoice {
                account: "1".into(),
                amount: 30,
                settled: false,
            },
        )
        .unwrap();
    invoices
        .set(
            "i2",
            &Invoice {
                account: "1".into(),
                amount: 12,
                settled: true,
            },
        )
        .unwrap();

    let unsettled = invoices.execute_finder("findUnsettled", &[json!(1)]).unwrap();
    assert_eq!(unsettled.len(), 1);
    assert_eq!(unsettled[0].amount, 30);
    assert_eq!(accounts.invoke_finder("findByStatus", &[]).unwrap().len(), 1);
    assert!(t
        .store
        .recent_queries()
        .iter()
        .all(|q| q.staleness() == Stale::False));
    t.session.stop().unwrap();
}

#[test]
fn test_rows_without_document_content_are_skipped() {
    let t = TestSession::new();
    let accounts = t.session.accessor::<Account>(account_finders()).unwrap();
    accounts.set("1", &account("ada", "ACTIVE", 3)).unwrap();
    // Non-JSON payloads are never indexed, so they cannot surface as rows
    t.store.upsert("ACCOUNT:2", "plain text").unwrap();
    assert_eq!(accounts.invoke_finder("findByStatus", &[]).unwrap().len(), 1);
    t.session.stop().unwrap();
}

#[test]
fn test_undeclared_finder_is_rejected() {
    let t = TestSession::new();
    let accounts: GenericAccessor<Account> =
        t.session.accessor(account_finders()).unwrap();
    assert!(matches!(
        accounts.invoke_finder("findByOwner", &[json!("ada")]),
        Err(Error::UnannotatedFinder { ref name }) if name == "findByOwner"
    ));
    t.session.stop().unwrap();
}

#[test]
fn test_provisioning_failure_aborts_accessor_creation() {
    let t = TestSession::new();
    t.store.set_unavailable(true);
    assert!(t
        .session
        .accessor::<Account>(account_finders())
        .unwrap_err()
        .is_remote_unavailable());
    t.store.set_unavailable(false);
    t.session.stop().unwrap();
}
