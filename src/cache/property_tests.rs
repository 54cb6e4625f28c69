//! Property-Based Tests for the Cache Facade
//!
//! Async operations are driven with `tokio_test::block_on` inside proptest.

use std::sync::Arc;

use proptest::prelude::*;

use crate::cache::{Cache, Value, STORE_OPERATION};
use crate::store::MemoryStore;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9 ]{0,64}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
    ]
}

fn new_cache() -> Cache {
    tokio_test::block_on(Cache::new(Arc::new(MemoryStore::new()))).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // A stored value reads back as its encoded bytes.
    #[test]
    fn prop_store_then_get(value in value_strategy()) {
        let cache = new_cache();

        let retrieved = tokio_test::block_on(async {
            let key = cache.store(value.clone()).await.unwrap();
            cache.get(Some(&key)).await.unwrap()
        });

        prop_assert_eq!(retrieved, Some(value.to_bytes()));
    }

    // After N stores: counter == N, both histories hold N aligned entries.
    #[test]
    fn prop_history_aligned(values in prop::collection::vec(value_strategy(), 1..20)) {
        let cache = new_cache();

        let (keys, history) = tokio_test::block_on(async {
            let mut keys = Vec::new();
            for value in &values {
                keys.push(cache.store(value.clone()).await.unwrap());
            }
            (keys, cache.replay(STORE_OPERATION).await.unwrap())
        });

        prop_assert_eq!(history.calls, values.len() as u64);
        prop_assert_eq!(history.records.len(), values.len());
        for ((record, value), key) in history.records.iter().zip(&values).zip(&keys) {
            prop_assert_eq!(&record.input, &serde_json::to_string(&(value,)).unwrap());
            prop_assert_eq!(&record.output, &format!("\"{}\"", key));
        }
    }

    // Typed getters never fail on arbitrary bytes.
    #[test]
    fn prop_typed_reads_are_fail_soft(raw in prop::collection::vec(any::<u8>(), 0..64)) {
        let cache = new_cache();

        let (text, int) = tokio_test::block_on(async {
            let key = cache.store(raw.clone()).await.unwrap();
            (cache.get_str(&key).await, cache.get_int(&key).await)
        });

        prop_assert!(text.is_ok());
        prop_assert!(int.is_ok());
        prop_assert_eq!(text.unwrap().is_some(), std::str::from_utf8(&raw).is_ok());
    }
}
