//! HTTP page fetcher backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;

const USER_AGENT: &str = concat!("redis-basic/", env!("CARGO_PKG_VERSION"));

/// Fetches pages with a plain GET. Non-success statuses are transport errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(%url, %status, "received page response");

        let body = response.error_for_status()?.text().await?;
        Ok(body)
    }
}
