//! Store Module
//!
//! The key-value capability set the cache layers are written against, and the
//! in-memory implementation used by the server and the tests.

mod entry;
mod keyspace;
mod memory;
mod stats;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::{current_timestamp_ms, Entry, Slot};
pub use keyspace::Keyspace;
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Key Value Store ==
/// Commands consumed by [`crate::cache::Cache`], the invocation recorder and
/// the page cache.
///
/// Every call is atomic on its own; nothing here spans two calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Stores `value` under `key` with no expiry.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn setex(&self, key: &str, ttl: Duration, value: Vec<u8>) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer at `key`, returning the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends to the list at `key`, returning its new length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Inclusive range of the list at `key`; negative indices count from the end.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Removes every key in the store.
    async fn flushdb(&self) -> Result<()>;
}

/// Store handle shared between the cache layers.
pub type SharedStore = Arc<dyn KeyValueStore>;
