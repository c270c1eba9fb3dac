//! Randomized CRUD properties

use crate::common::*;
use proptest::prelude::*;
use std::sync::Arc;
use viewbase::{DocumentKey, GenericAccessor, MemoryStore};

fn arb_account() -> impl Strategy<Value = Account> {
    (
        "[a-z]{1,12}",
        prop_oneof![Just("ACTIVE"), Just("FROZEN"), Just("CLOSED")],
        any::<i64>(),
        prop::collection::vec("[a-z]{0,6}", 0..4),
    )
        .prop_map(|(owner, status, balance, tags)| Account {
            owner,
            status: status.to_string(),
            balance,
            tags,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_create_then_read_round_trips(id in "[A-Za-z0-9_-]{1,32}", value in arb_account()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let accounts = GenericAccessor::<Account>::new(
            Arc::new(MemoryStore::new()),
            account_finders(),
        );
        accounts.create(&id, &value).unwrap();
        let read = runtime.block_on(accounts.read(&id)).unwrap();
        prop_assert_eq!(read, value);
    }

    #[test]
    fn prop_active_finder_matches_status(values in prop::collection::vec(arb_account(), 0..12)) {
        let accounts = GenericAccessor::<Account>::new(
            Arc::new(MemoryStore::new()),
            account_finders(),
        );
        accounts.rebuild().unwrap();
        for (i, v) in values.iter().enumerate() {
            accounts.set(&format!("{:03}", i), v).unwrap();
        }
        let expected: Vec<Account> = values
            .iter()
            .filter(|v| v.status == "ACTIVE")
            .cloned()
            .collect();
        prop_assert_eq!(accounts.invoke_finder("findByStatus", &[]).unwrap(), expected);
    }

    #[test]
    fn prop_distinct_types_never_share_keys(id in "[A-Za-z0-9:._-]{0,64}") {
        let a = DocumentKey::for_entity::<Account>(&id).unwrap();
        let i = DocumentKey::for_entity::<Invoice>(&id).unwrap();
        prop_assert_ne!(a.to_string(), i.to_string());
    }
}
