//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::Value;

/// Request body for PUT /store
///
/// `value` may be a JSON string, integer, float or array of bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub value: Value,
}

/// Query string for GET /page
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Absolute http(s) URL to fetch
    pub url: String,
}

impl PageQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("url cannot be empty".to_string());
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Some("url must start with http:// or https://".to_string());
        }
        None
    }
}
