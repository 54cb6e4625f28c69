//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{HttpFetcher, PageCache, SharedFetcher};
use crate::models::{
    GetResponse, HealthResponse, PageQuery, PageResponse, ReplayResponse, StatsResponse,
    StoreRequest, StoreResponse,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
///
/// The cache and the page cache share one memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub cache: Cache,
    pub pages: PageCache,
}

impl AppState {
    /// Builds state over `store`. Flushes the store (see [`Cache::new`]).
    pub async fn new(store: MemoryStore, fetcher: SharedFetcher, page_ttl: Duration) -> Result<Self> {
        let shared = Arc::new(store.clone());
        let cache = Cache::new(shared.clone()).await?;
        let pages = PageCache::new(shared, fetcher, page_ttl);

        Ok(Self {
            store,
            cache,
            pages,
        })
    }

    /// Builds state from configuration with an HTTP page fetcher.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Self::new(MemoryStore::new(), Arc::new(fetcher), config.page_ttl()).await
    }
}

/// Handler for PUT /store
///
/// Stores the value under a generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Returns the value as text and as an integer where it decodes as such.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    if state.cache.get(Some(&key)).await?.is_none() {
        return Err(CacheError::NotFound(key));
    }

    let text = state.cache.get_str(&key).await?;
    let integer = state.cache.get_int(&key).await?;

    Ok(Json(GetResponse { key, text, integer }))
}

/// Handler for GET /replay/:identity
///
/// Returns the recorded call history of an operation and logs its rendering.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let history = state.cache.replay(&identity).await?;
    info!("{}", history);

    Ok(Json(history.into()))
}

/// Handler for GET /page?url=...
///
/// Fetches a page through the page cache.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.pages.get_page(&query.url).await?;
    let access_count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.store.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
