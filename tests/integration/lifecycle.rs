//! Session lifecycle through a config file

use crate::common::*;
use std::sync::Arc;
use tempfile::TempDir;
use viewbase::{
    DocumentStore, Error, MemoryStore, ProvisioningMode, Session, ViewbaseConfig,
    CONFIG_FILE_NAME,
};

#[test]
fn test_session_from_default_config_file() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    ViewbaseConfig::write_default_if_missing(&path).unwrap();

    let config = ViewbaseConfig::from_file(&path).unwrap();
    let session = Session::start(config, Arc::new(MemoryStore::new())).unwrap();
    assert_eq!(session.config().bucket, "default");
    assert_eq!(session.provisioning_mode(), ProvisioningMode::Racy);
    session.stop().unwrap();
}

#[test]
fn test_guarded_mode_from_config_file() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "provisioning = \"guarded\"\nwarm_up_ms = 0\n").unwrap();

    let t = TestSession::with_config(ViewbaseConfig::from_file(&path).unwrap());
    assert_eq!(t.session.provisioning_mode(), ProvisioningMode::Guarded);
    let accounts = t.session.accessor::<Account>(account_finders()).unwrap();
    assert_eq!(accounts.cached_finders().len(), 2);
    t.session.stop().unwrap();
}

#[tokio::test]
async fn test_crud_through_session() {
    let t = TestSession::new();
    let accounts = t.session.accessor::<Account>(account_finders()).unwrap();

    accounts.create("a1", &account("ada", "ACTIVE", 100)).unwrap();
    assert_eq!(accounts.read("a1").await.unwrap().balance, 100);

    accounts.update("a1", &account("ada", "ACTIVE", 80)).unwrap();
    accounts.set("a2", &account("bob", "FROZEN", 0)).unwrap();
    accounts.delete("a2").unwrap();

    assert_eq!(accounts.read("a1").await.unwrap().balance, 80);
    assert!(accounts.read("a2").await.unwrap_err().is_not_found());
    assert!(t.store.get("ACCOUNT:a1").unwrap().is_some());
    t.session.stop().unwrap();
}

#[test]
fn test_accessor_after_stop_is_refused() {
    let t = TestSession::new();
    t.session.stop().unwrap();
    assert_eq!(
        t.session.accessor::<Account>(account_finders()).unwrap_err(),
        Error::SessionClosed
    );
    assert!(t.store.design_documents().unwrap().is_empty());
}

#[test]
fn test_check_holds_then_stops() {
    init_tracing();
    let config = ViewbaseConfig {
        warm_up_ms: 10,
        ..ViewbaseConfig::default()
    };
    let started = std::time::Instant::now();
    Session::check(config, Arc::new(MemoryStore::new())).unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(10));
}

#[test]
fn test_check_reports_unreachable_store() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    store.set_unavailable(true);
    assert!(Session::check(quick_config(), store)
        .unwrap_err()
        .is_remote_unavailable());
}
