//! Match cache for classification results.
//!
//! Maps raw input strings to the result a full rule scan produced for them.
//! Backed by a concurrent, size-bounded `quick_cache` so lookups never take
//! the rule list lock.

use quick_cache::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::UserAgent;

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Configuration for the match cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub capacity: usize,
    /// Whether to enable caching.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with the specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            enabled: true,
        }
    }

    /// Create a configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self {
            capacity: 0,
            enabled: false,
        }
    }
}

/// Concurrent memo from input string to classification result.
pub struct MatchCache {
    inner: Option<Cache<String, Arc<UserAgent>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MatchCache {
    /// Create a cache from its configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let inner = if config.enabled && config.capacity > 0 {
            Some(Cache::new(config.capacity))
        } else {
            None
        };

        Self {
            capacity: if inner.is_some() { config.capacity } else { 0 },
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a previously stored result.
    pub fn get(&self, key: &str) -> Option<Arc<UserAgent>> {
        let cache = self.inner.as_ref()?;
        match cache.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a result.
    pub fn put(&self, key: &str, value: Arc<UserAgent>) {
        if let Some(ref cache) = self.inner {
            cache.insert(key.to_string(), value);
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |cache| cache.len())
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries and reset statistics.
    pub fn clear(&self) {
        if let Some(ref cache) = self.inner {
            cache.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.capacity,
            len: self.len(),
            enabled: self.inner.is_some(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for MatchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to a rule scan.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0.0 when none happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
