//! Response Cache Module
//!
//! In-memory map from request keys to computed JSON responses, with lazy TTL
//! expiry. There is no size bound and no eviction other than expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, Clock, SystemClock};

// == Response Cache ==
/// Read-through response cache.
#[derive(Debug)]
pub struct ResponseCache {
    /// Stored payloads
    entries: HashMap<CacheKey, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL applied when `set` is not given one
    default_ttl: Duration,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    // == Constructor ==
    /// Creates an empty cache backed by the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache that reads time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            clock,
        }
    }

    // == Has ==
    /// Returns true if `key` holds an unexpired entry.
    pub fn has(&self, key: &CacheKey) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Get ==
    /// Returns the stored payload for `key`.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                debug!(%key, "cache entry expired");
                None
            }
            Some(entry) => {
                self.stats.record_hit();
                debug!(%key, age_ms = entry.age(now).as_millis() as u64, "cache hit");
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                debug!(%key, "cache miss");
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// Uses the cache's default TTL when `ttl` is `None`.
    pub fn set(&mut self, key: CacheKey, value: Value, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        debug!(%key, ttl_secs = ttl.as_secs(), "cache store");
        self.entries.insert(key, entry);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of stored entries, expired ones included until looked up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
