//! Memory Store Module
//!
//! Thread-safe handle over a [`Keyspace`], implementing [`KeyValueStore`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::store::{Keyspace, KeyValueStore, StoreStats};

// == Memory Store ==
/// In-process key-value store.
///
/// Cloning is cheap and every clone sees the same keyspace. Each command takes
/// the write lock once, so individual commands are atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keyspace: Arc<RwLock<Keyspace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes expired keys, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.keyspace.write().await.purge_expired()
    }

    pub async fn stats(&self) -> StoreStats {
        self.keyspace.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        debug!(key, bytes = value.len(), "SET");
        self.keyspace.write().await.set(key, value, None);
        Ok(())
    }

    async fn setex(&self, key: &str, ttl: Duration, value: Vec<u8>) -> Result<()> {
        debug!(key, ttl_ms = ttl.as_millis() as u64, bytes = value.len(), "SETEX");
        self.keyspace.write().await.set(key, value, Some(ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: lookups drop expired keys and update stats
        self.keyspace.write().await.get(key)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.keyspace.write().await.incr(key)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.keyspace.write().await.rpush(key, value)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.keyspace.write().await.lrange(key, start, stop)
    }

    async fn flushdb(&self) -> Result<()> {
        debug!("FLUSHDB");
        self.keyspace.write().await.flush();
        Ok(())
    }
}
