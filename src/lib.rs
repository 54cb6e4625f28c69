//! Redis Basic - an instrumented cache facade
//!
//! Stores values under generated keys, records call counts and histories, and
//! caches page fetches for a fixed TTL, all on top of a key-value store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, InvocationRecorder, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{Fetcher, HttpFetcher, PageCache};
pub use store::{KeyValueStore, MemoryStore, SharedStore};
pub use tasks::spawn_expiry_task;
