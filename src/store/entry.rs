//! Store Entry Module
//!
//! Defines the structure for individual keyspace entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Slot ==
/// The kind of value a key holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Plain byte string (SET/GET/INCR)
    Bytes(Vec<u8>),
    /// Ordered list of byte strings (RPUSH/LRANGE)
    List(Vec<Vec<u8>>),
}

// == Entry ==
/// Represents a single keyspace entry with value and metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored value
    pub slot: Slot,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    pub fn new(slot: Slot, ttl: Option<Duration>) -> Self {
        let expires_at =
            ttl.map(|ttl| current_timestamp_ms().saturating_add(ttl.as_millis() as u64));

        Self { slot, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
