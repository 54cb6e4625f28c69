//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CallHistory, CallRecord};
use crate::store::StoreStats;

/// Response body for PUT /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Generated key the value was stored under
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for GET /get/:key
///
/// `text` and `integer` are null when the stored bytes don't decode as such.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub text: Option<String>,
    pub integer: Option<i64>,
}

/// Response body for GET /replay/:identity
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub identity: String,
    pub calls: u64,
    pub history: Vec<CallRecord>,
}

impl From<CallHistory> for ReplayResponse {
    fn from(history: CallHistory) -> Self {
        Self {
            identity: history.identity,
            calls: history.calls,
            history: history.records,
        }
    }
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub content: String,
    /// Accesses of this URL so far, this one included
    pub access_count: u64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads that found a live key
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Keys dropped after their TTL
    pub expired: u64,
    /// Current number of keys
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serializes_nulls() {
        let resp = GetResponse {
            key: "k".to_string(),
            text: Some("hello".to_string()),
            integer: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["text"], "hello");
        assert!(json["integer"].is_null());
    }

    #[test]
    fn test_replay_response_from_history() {
        let history = CallHistory {
            identity: "Cache.store".to_string(),
            calls: 1,
            records: vec![CallRecord {
                input: r#"["a"]"#.to_string(),
                output: r#""k""#.to_string(),
            }],
        };

        let resp = ReplayResponse::from(history);
        assert_eq!(resp.calls, 1);
        assert_eq!(resp.history[0].input, r#"["a"]"#);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = StoreStats {
            hits: 80,
            misses: 20,
            expired: 5,
            total_entries: 100,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expired, 5);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
