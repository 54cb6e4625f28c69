//! Cache Facade Module
//!
//! Stores values under generated keys and reads them back as raw bytes, text
//! or integers.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::decode::{self, DecodeError};
use crate::cache::{CallHistory, InvocationRecorder, Value};
use crate::error::Result;
use crate::store::SharedStore;

/// Identity under which [`Cache::store`] invocations are recorded.
pub const STORE_OPERATION: &str = "Cache.store";

// == Cache ==
#[derive(Clone)]
pub struct Cache {
    store: SharedStore,
    recorder: InvocationRecorder,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store`.
    ///
    /// **Destructive:** this flushes every key in the backing store, including
    /// keys written by anything else sharing it.
    pub async fn new(store: SharedStore) -> Result<Self> {
        store.flushdb().await?;
        warn!("backing store flushed for new cache");

        Ok(Self {
            recorder: InvocationRecorder::new(store.clone()),
            store,
        })
    }

    // == Store ==
    /// Writes `value` under a fresh UUID key and returns the key.
    ///
    /// Recorded under [`STORE_OPERATION`].
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        let store = self.store.clone();
        self.recorder
            .record(STORE_OPERATION, (value.into(),), move |(value,)| {
                write_new(store, value)
            })
            .await
    }

    // == Get ==
    /// Raw bytes under `key`, or None when `key` is None or not in the store.
    pub async fn get(&self, key: Option<&str>) -> Result<Option<Vec<u8>>> {
        match key {
            Some(key) => self.store.get(key).await,
            None => Ok(None),
        }
    }

    /// Like [`Cache::get`], applying `decoder` to a present value.
    pub async fn get_with<T, F>(&self, key: Option<&str>, decoder: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> T,
    {
        Ok(self.get(key).await?.map(decoder))
    }

    /// Value under `key` as UTF-8 text; None if missing or not valid UTF-8.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        let decoded = self.get_with(Some(key), |raw| decode::utf8(&raw)).await?;
        Ok(soften(key, decoded))
    }

    /// Value under `key` as an integer; None if missing or not an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        let decoded = self.get_with(Some(key), |raw| decode::integer(&raw)).await?;
        Ok(soften(key, decoded))
    }

    // == Instrumentation ==
    pub async fn call_count(&self, identity: &str) -> Result<u64> {
        self.recorder.call_count(identity).await
    }

    pub async fn replay(&self, identity: &str) -> Result<CallHistory> {
        self.recorder.replay(identity).await
    }
}

async fn write_new(store: SharedStore, value: Value) -> Result<String> {
    let key = Uuid::new_v4().to_string();
    store.set(&key, value.to_bytes()).await?;
    debug!(key = %key, "stored value");
    Ok(key)
}

/// Decode failures read as absent values.
fn soften<T>(key: &str, decoded: Option<std::result::Result<T, DecodeError>>) -> Option<T> {
    match decoded {
        Some(Ok(value)) => Some(value),
        Some(Err(err)) => {
            debug!(key, error = %err, "typed read fell back to none");
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::CacheError;
    use crate::store::{KeyValueStore, MemoryStore};

    async fn cache() -> (Cache, MemoryStore) {
        let store = MemoryStore::new();
        let cache = Cache::new(Arc::new(store.clone())).await.unwrap();
        (cache, store)
    }

    #[tokio::test]
    async fn test_new_flushes_store() {
        let store = MemoryStore::new();
        store.set("leftover", b"x".to_vec()).await.unwrap();

        let _cache = Cache::new(Arc::new(store.clone())).await.unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_hello_scenario() {
        let (cache, _) = cache().await;

        let key = cache.store("hello").await.unwrap();

        assert_eq!(cache.get(Some(&key)).await.unwrap(), Some(b"hello".to_vec()));
        assert_eq!(cache.get_str(&key).await.unwrap(), Some("hello".to_string()));
        assert_eq!(cache.get_int(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_generates_unique_uuid_keys() {
        let (cache, _) = cache().await;

        let a = cache.store("same").await.unwrap();
        let b = cache.store("same").await.unwrap();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[tokio::test]
    async fn test_typed_values() {
        let (cache, _) = cache().await;

        let int_key = cache.store(42i64).await.unwrap();
        let float_key = cache.store(2.5).await.unwrap();
        let bytes_key = cache.store(vec![0xffu8, 0x00]).await.unwrap();

        assert_eq!(cache.get_int(&int_key).await.unwrap(), Some(42));
        assert_eq!(cache.get_str(&int_key).await.unwrap(), Some("42".to_string()));
        assert_eq!(cache.get_str(&float_key).await.unwrap(), Some("2.5".to_string()));
        assert_eq!(cache.get_int(&float_key).await.unwrap(), None);
        assert_eq!(cache.get_str(&bytes_key).await.unwrap(), None);
        assert_eq!(
            cache.get(Some(&bytes_key)).await.unwrap(),
            Some(vec![0xff, 0x00])
        );
    }

    #[tokio::test]
    async fn test_get_absent_cases() {
        let (cache, _) = cache().await;

        assert_eq!(cache.get(None).await.unwrap(), None);
        assert_eq!(cache.get(Some("missing")).await.unwrap(), None);
        assert_eq!(cache.get_str("missing").await.unwrap(), None);
        assert_eq!(cache.get_int("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_with_decoder() {
        let (cache, _) = cache().await;
        let key = cache.store("abc").await.unwrap();

        let len = cache.get_with(Some(&key), |raw| raw.len()).await.unwrap();
        assert_eq!(len, Some(3));

        let never_called = cache
            .get_with(Some("missing"), |_| -> usize { panic!("decoder ran on absent value") })
            .await
            .unwrap();
        assert_eq!(never_called, None);
    }

    /// Delegates to a memory store until switched off. `set` can be slowed.
    struct FlakyStore {
        inner: MemoryStore,
        down: AtomicBool,
        set_delay: Duration,
    }

    impl FlakyStore {
        fn new(set_delay: Duration) -> Self {
            Self {
                inner: MemoryStore::new(),
                down: AtomicBool::new(false),
                set_delay,
            }
        }

        fn check(&self) -> Result<()> {
            if self.down.load(Ordering::SeqCst) {
                Err(CacheError::StoreUnavailable("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
            self.check()?;
            tokio::time::sleep(self.set_delay).await;
            self.inner.set(key, value).await
        }

        async fn setex(&self, key: &str, ttl: Duration, value: Vec<u8>) -> Result<()> {
            self.check()?;
            self.inner.setex(key, ttl, value).await
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.check()?;
            self.inner.get(key).await
        }

        async fn incr(&self, key: &str) -> Result<i64> {
            self.check()?;
            self.inner.incr(key).await
        }

        async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
            self.check()?;
            self.inner.rpush(key, value).await
        }

        async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
            self.check()?;
            self.inner.lrange(key, start, stop).await
        }

        async fn flushdb(&self) -> Result<()> {
            self.check()?;
            self.inner.flushdb().await
        }
    }

    #[tokio::test]
    async fn test_store_unavailable_propagates() {
        let flaky = Arc::new(FlakyStore::new(Duration::ZERO));
        let cache = Cache::new(flaky.clone()).await.unwrap();

        flaky.down.store(true, Ordering::SeqCst);

        assert!(matches!(cache.store("v").await, Err(CacheError::StoreUnavailable(_))));
        assert!(matches!(cache.get(Some("k")).await, Err(CacheError::StoreUnavailable(_))));
        assert!(matches!(cache.get_str("k").await, Err(CacheError::StoreUnavailable(_))));
        assert!(matches!(
            Cache::new(flaky.clone()).await,
            Err(CacheError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_store_is_recorded() {
        let (cache, _) = cache().await;

        let first = cache.store("first").await.unwrap();
        let second = cache.store(2i64).await.unwrap();

        assert_eq!(cache.call_count(STORE_OPERATION).await.unwrap(), 2);

        let history = cache.replay(STORE_OPERATION).await.unwrap();
        assert_eq!(history.records.len(), 2);
        assert_eq!(history.records[0].input, r#"["first"]"#);
        assert_eq!(history.records[0].output, format!("\"{}\"", first));
        assert_eq!(history.records[1].input, "[2]");
        assert_eq!(history.records[1].output, format!("\"{}\"", second));
    }

    #[tokio::test]
    async fn test_cancelled_store_keeps_history_aligned() {
        let slow = Arc::new(FlakyStore::new(Duration::from_millis(50)));
        let cache = Cache::new(slow.clone()).await.unwrap();

        let abandoned = tokio::time::timeout(Duration::from_millis(10), cache.store("a")).await;
        assert!(abandoned.is_err());

        // the abandoned write still completes in the background
        tokio::time::sleep(Duration::from_millis(100)).await;
        let b = cache.store("b").await.unwrap();

        let history = cache.replay(STORE_OPERATION).await.unwrap();
        assert_eq!(history.calls, 2);
        assert_eq!(history.records.len(), 2);
        assert_eq!(history.records[0].input, r#"["a"]"#);
        let a: String = serde_json::from_str(&history.records[0].output).unwrap();
        assert_eq!(cache.get_str(&a).await.unwrap(), Some("a".to_string()));
        assert_eq!(history.records[1].input, r#"["b"]"#);
        assert_eq!(history.records[1].output, format!("\"{}\"", b));
    }
}
