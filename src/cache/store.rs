use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::CacheKey;

/// Default time-to-live for cached responses.
/// Five minutes keeps slowly-changing data fresh without hammering the API;
/// individual resources override this with shorter or longer windows.
const DEFAULT_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    timestamp: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp <= self.ttl
    }
}

/// Snapshot of cache contents, for diagnostics only.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

/// In-memory TTL cache for read-endpoint responses.
///
/// Entries expire lazily: an expired entry is removed the next time `get`
/// touches it, there is no background sweep. Writers evict affected entries
/// through `invalidate` or `invalidate_pattern` after a successful mutation.
///
/// The cache never errors. Misses, expiry, and invalidation of absent keys
/// are all normal, silent outcomes. There is no size bound.
///
/// This is a plain single-owner structure; callers that share it across
/// tasks wrap it in a lock (see `CityLensClient`).
#[derive(Debug)]
pub struct RequestCache {
    entries: HashMap<String, CacheEntry>,
    default_ttl: Duration,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
        }
    }

    /// Look up a cached response. Expired entries are removed on access and
    /// reported as absent.
    pub fn get(&mut self, key: &CacheKey) -> Option<Value> {
        let now = Utc::now();
        let valid = match self.entries.get(key.as_str()) {
            Some(entry) => entry.is_valid(now),
            None => return None,
        };

        if !valid {
            debug!(key = key.as_str(), "cache entry expired");
            self.entries.remove(key.as_str());
            return None;
        }

        debug!(key = key.as_str(), "cache hit");
        self.entries.get(key.as_str()).map(|entry| entry.data.clone())
    }

    /// Store a response, replacing any existing entry for the key and
    /// resetting its expiry clock. `ttl: None` uses the process default.
    pub fn set(&mut self, key: &CacheKey, data: Value, ttl: Option<Duration>) {
        let entry = CacheEntry {
            data,
            timestamp: Utc::now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.entries.insert(key.as_str().to_string(), entry);
    }

    /// Remove the entry for exactly this key. No-op if absent.
    pub fn invalidate(&mut self, key: &CacheKey) {
        self.entries.remove(key.as_str());
    }

    /// Remove every entry whose key matches the pattern. Returns the number
    /// of entries removed. A pattern that matches nothing is a silent no-op.
    ///
    /// Callers use this after a write to evict every cached list/summary for
    /// the mutated resource without enumerating param combinations.
    pub fn invalidate_pattern(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(pattern = pattern.as_str(), removed, "invalidated cache entries");
        }
        removed
    }

    /// Remove all entries unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }

    /// Shift an entry's timestamp into the past, for expiry tests.
    #[cfg(test)]
    fn backdate(&mut self, key: &CacheKey, age: Duration) {
        if let Some(entry) = self.entries.get_mut(key.as_str()) {
            entry.timestamp = entry.timestamp - age;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
