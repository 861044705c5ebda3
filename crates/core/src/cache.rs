//! Bounded in-memory cache for upstream responses
//!
//! Provides a process-wide key-value store that:
//! - Holds at most `capacity` entries, evicting the least recently used
//! - Optionally expires entries after a fixed time-to-live
//! - Tracks hit/miss/eviction counts for observability
//!
//! Only successful upstream responses should be stored; callers decide what
//! counts as success.
//!
//! # Example
//!
//! ```rust
//! use calorie_core::cache::{BoundedCache, CacheConfig};
//! use std::time::Duration;
//!
//! let cache = BoundedCache::new(CacheConfig::new(128).with_ttl(Duration::from_secs(3600)));
//!
//! cache.put("food::171705", 52.0_f64);
//! assert_eq!(cache.get("food::171705"), Some(52.0));
//! ```

use crate::config::CacheSettings;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries kept before LRU eviction
    pub capacity: usize,
    /// Entry lifetime (`None` = entries live until evicted)
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl: Some(Duration::from_secs(24 * 3600)),
        }
    }
}

impl CacheConfig {
    /// Create a configuration with the given capacity and no expiry
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ttl: None,
        }
    }

    /// Builder-style method to set the entry lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            capacity: settings.capacity,
            ttl: (settings.ttl_secs > 0).then(|| Duration::from_secs(settings.ttl_secs)),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Thread-safe LRU cache with optional expiry
pub struct BoundedCache<V> {
    store: Mutex<LruCache<String, CacheEntry<V>>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> BoundedCache<V> {
    /// Fallback capacity when configuration asks for zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a new cache
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(Self::DEFAULT_CAPACITY);

        Self {
            store: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Get a cached value, refreshing its recency
    pub fn get(&self, key: &str) -> Option<V> {
        // Handle poisoned lock by recovering the data (entries are still consistent)
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        let value = match store.get(key) {
            Some(entry) if entry.is_expired(now) => {
                store.pop(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        };
        drop(store);

        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    /// Store a value using the configured lifetime
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.ttl);
    }

    /// Store a value with an explicit lifetime (`None` = no expiry)
    ///
    /// A lifetime too long to represent as an instant never expires.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let entry = CacheEntry {
            value,
            expires_at: ttl.and_then(|d| Instant::now().checked_add(d)),
        };

        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        // `push` also returns the previous entry when the key was already present
        if let Some((evicted_key, _)) = store.push(key.clone(), entry) {
            if evicted_key != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Remove a cached value, returning whether it existed
    pub fn remove(&self, key: &str) -> bool {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.pop(key).is_some()
    }

    /// Clear all cached values
    pub fn clear(&self) {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.clear();
    }

    /// Drop expired entries, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        let expired: Vec<String> = store
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            store.pop(key);
        }

        expired.len()
    }

    /// Number of entries currently held (expired entries included until touched)
    pub fn len(&self) -> usize {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());

        CacheStats {
            entries: store.len(),
            capacity: store.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries held
    pub entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to make room for new ones
    pub evictions: u64,
}
