//! Cache Entry Module
//!
//! A stored response payload together with its timestamps.

use std::time::Duration;

use serde_json::Value;

// == Cache Entry ==
/// A cached JSON payload. Entries are never mutated after creation.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped at `now_ms` that lives for `ttl`.
    pub fn new(value: Value, now_ms: u64, ttl: Duration) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl.as_millis() as u64),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now_ms` reaches its expiration time, so a
    /// lookup exactly one TTL after creation already misses.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    /// Age of the entry at `now_ms`.
    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.created_at))
    }
}
