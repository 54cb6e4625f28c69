//! Keyspace Module
//!
//! Main storage engine: a HashMap of entries with lazy TTL expiration and the
//! string, counter and list commands the cache layers rely on.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{CacheError, Result};
use crate::store::{Entry, Slot, StoreStats};

// == Keyspace ==
/// In-memory keyspace with TTL support.
#[derive(Debug, Default)]
pub struct Keyspace {
    /// Key-value storage
    entries: HashMap<String, Entry>,
    /// Performance statistics
    stats: StoreStats,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a byte string, replacing whatever the key held.
    ///
    /// A previous TTL is discarded; `ttl` of None means the key never expires.
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Option<Duration>) {
        self.entries
            .insert(key.to_string(), Entry::new(Slot::Bytes(value), ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a byte string by key.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.live_entry(key) {
            Some(entry) => match &entry.slot {
                Slot::Bytes(value) => {
                    let value = value.clone();
                    self.stats.record_hit();
                    Ok(Some(value))
                }
                Slot::List(_) => Err(wrong_type(key, "a list")),
            },
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Incr ==
    /// Increments the integer stored at `key` by one and returns the new value.
    ///
    /// A missing key counts as 0. An existing TTL is kept.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        let current = match self.live_entry(key).map(|entry| &entry.slot) {
            None => 0,
            Some(Slot::Bytes(raw)) => parse_counter(raw)
                .ok_or_else(|| wrong_type(key, "a value that is not an integer"))?,
            Some(Slot::List(_)) => return Err(wrong_type(key, "a list")),
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| wrong_type(key, "a counter that would overflow"))?;
        let encoded = next.to_string().into_bytes();

        match self.entries.get_mut(key) {
            Some(entry) => entry.slot = Slot::Bytes(encoded),
            None => self.set(key, encoded, None),
        }
        Ok(next)
    }

    // == Rpush ==
    /// Appends a value to the list at `key`, creating it if needed.
    ///
    /// Returns the length of the list after the push.
    pub fn rpush(&mut self, key: &str, value: Vec<u8>) -> Result<usize> {
        if let Some(entry) = self.live_entry(key) {
            return match &mut entry.slot {
                Slot::List(items) => {
                    items.push(value);
                    Ok(items.len())
                }
                Slot::Bytes(_) => Err(wrong_type(key, "a string")),
            };
        }

        self.entries
            .insert(key.to_string(), Entry::new(Slot::List(vec![value]), None));
        self.stats.set_total_entries(self.entries.len());
        Ok(1)
    }

    // == Lrange ==
    /// Returns the inclusive range `start..=stop` of the list at `key`.
    ///
    /// Negative indices count from the tail (-1 is the last element). Out of
    /// range indices are clamped; a missing key yields an empty list.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let items = match self.live_entry(key) {
            Some(entry) => match &entry.slot {
                Slot::List(items) => items,
                Slot::Bytes(_) => return Err(wrong_type(key, "a string")),
            },
            None => return Ok(Vec::new()),
        };

        let len = items.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

        if len == 0 || start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(items[start as usize..=stop as usize].to_vec())
    }

    // == Flush ==
    /// Removes every key.
    pub fn flush(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes all expired entries from the keyspace.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - self.entries.len();
        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current keyspace statistics.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a key, dropping it first if its TTL has elapsed.
    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        if self.entries.get(key).is_some_and(Entry::is_expired) {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.set_total_entries(self.entries.len());
        }
        self.entries.get_mut(key)
    }
}

fn parse_counter(raw: &[u8]) -> Option<i64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}

fn wrong_type(key: &str, held: &str) -> CacheError {
    CacheError::WrongType(format!("key '{}' holds {}", key, held))
}
