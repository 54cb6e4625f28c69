//! Fetch Module
//!
//! Page fetching and the URL-keyed page cache in front of it.

mod http;
mod page_cache;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpFetcher;
pub use page_cache::{count_key, result_key, PageCache, DEFAULT_PAGE_TTL};

/// Source of page content.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Returns the body at `url`. Errors are passed to the caller untouched.
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub type SharedFetcher = Arc<dyn Fetcher>;
