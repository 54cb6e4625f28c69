//! Page Cache Module
//!
//! Counts accesses per URL and keeps fetched pages for a fixed TTL.
//!
//! Keys per URL:
//! - `count:{url}` - access counter, never expires
//! - `result:{url}` - cached page body, expires after the TTL

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::decode;
use crate::error::{CacheError, Result};
use crate::fetch::SharedFetcher;
use crate::store::SharedStore;

pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

pub fn result_key(url: &str) -> String {
    format!("result:{}", url)
}

// == Page Cache ==
#[derive(Clone)]
pub struct PageCache {
    store: SharedStore,
    fetcher: SharedFetcher,
    ttl: Duration,
}

impl PageCache {
    pub fn new(store: SharedStore, fetcher: SharedFetcher, ttl: Duration) -> Self {
        Self {
            store,
            fetcher,
            ttl,
        }
    }

    // == Get Page ==
    /// Returns the page at `url`, from cache while the TTL runs.
    ///
    /// Every call counts as an access, hits included. The counter is never
    /// reset. Two concurrent misses may both fetch; the later write wins.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let accesses = self.store.incr(&count_key(url)).await?;

        if let Some(raw) = self.store.get(&result_key(url)).await? {
            match decode::utf8(&raw) {
                Ok(content) => {
                    debug!(%url, accesses, "page cache hit");
                    return Ok(content);
                }
                Err(err) => warn!(%url, error = %err, "cached page unreadable, refetching"),
            }
        }

        let content = self.fetcher.fetch(url).await?;
        self.store
            .setex(&result_key(url), self.ttl, content.clone().into_bytes())
            .await?;
        info!(%url, accesses, bytes = content.len(), "page fetched and cached");

        Ok(content)
    }

    // == Access Count ==
    /// Number of times `url` was requested through this cache.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => decode::integer(&raw)
                .ok()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| {
                    CacheError::WrongType(format!("access counter for '{}' is corrupt", url))
                }),
            None => Ok(0),
        }
    }
}
