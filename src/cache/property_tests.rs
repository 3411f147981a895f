//! Property-Based Tests for Cache Module

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::CacheStore;

const TEST_DEFAULT_TTL: u64 = 300;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: String, value: u32 },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Insert { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The store behaves like a plain map while nothing expires, and the
    /// counters match the lookups and invalidations performed.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        let mut model: HashMap<String, u32> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;
        let mut expected_invalidations = 0u64;

        for op in ops {
            match op {
                CacheOp::Insert { key, value } => {
                    store.insert(key.clone(), value);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key);
                    prop_assert_eq!(got, model.get(&key).copied());
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Invalidate { key } => {
                    let removed = store.invalidate(&key);
                    prop_assert_eq!(removed, model.remove(&key).is_some());
                    if removed {
                        expected_invalidations += 1;
                    }
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.invalidations, expected_invalidations);
        prop_assert_eq!(stats.total_entries, model.len());
        prop_assert_eq!(store.len(), model.len());
    }

    /// Invalidating a key makes the next lookup a miss.
    #[test]
    fn prop_invalidate_removes_entry(key in key_strategy(), value in any::<u32>()) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        store.insert(key.clone(), value);

        prop_assert!(store.invalidate(&key));
        prop_assert_eq!(store.get(&key), None);
    }

    /// The last insert for a key wins.
    #[test]
    fn prop_overwrite_semantics(key in key_strategy(), first in any::<u32>(), second in any::<u32>()) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        store.insert(key.clone(), first);
        store.insert(key.clone(), second);

        prop_assert_eq!(store.get(&key), Some(second));
        prop_assert_eq!(store.len(), 1);
    }

    /// Cleanup never removes live entries.
    #[test]
    fn prop_cleanup_keeps_live_entries(keys in prop::collection::hash_set(key_strategy(), 0..20)) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        for key in &keys {
            store.insert(key.clone(), 1u8);
        }

        prop_assert_eq!(store.cleanup_expired(), 0);
        prop_assert_eq!(store.len(), keys.len());
    }
}
