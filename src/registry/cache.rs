//! TTL cache for resolved records and protocol stats.
//!
//! Entries expire lazily: an expired entry is evicted by the `get` that
//! finds it. There is no background sweeper. A capacity bound evicts the
//! least recently used entry when full.

use lru::LruCache;
use parking_lot::Mutex;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::types::{AgentId, AgentRecord, ProtocolStats};

/// Default TTL (30 seconds).
pub const DEFAULT_TTL: Duration = Duration::from_millis(30_000);

/// Default capacity.
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Cache keys used by the registry client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A resolved birth certificate.
    Agent(AgentId),
    /// Aggregate protocol counters.
    Stats,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(id) => write!(f, "agent:{id}"),
            Self::Stats => f.write_str("stats"),
        }
    }
}

/// Values stored by the registry client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    /// See [`CacheKey::Agent`].
    Agent(AgentRecord),
    /// See [`CacheKey::Stats`].
    Stats(ProtocolStats),
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Cache statistics for monitoring.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses, expired entries included.
    pub misses: u64,
    /// Number of entries evicted on read because they had expired.
    pub expirations: u64,
    /// Number of entries inserted.
    pub insertions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Read-through cache with one TTL shared by every key.
#[derive(Clone)]
pub struct TtlCache<K: Hash + Eq, V> {
    inner: Arc<Mutex<LruCache<K, CacheEntry<V>>>>,
    stats: Arc<Mutex<CacheStats>>,
    ttl: Duration,
}

/// The cache owned by a registry client.
pub type RegistryCache = TtlCache<CacheKey, CachedValue>;

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    /// Create a cache with the default TTL and capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache with the given TTL and capacity.
    #[must_use]
    pub fn with_ttl(ttl: Duration, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(cap))),
            stats: Arc::new(Mutex::new(CacheStats::default())),
            ttl,
        }
    }

    /// The TTL applied to every insert.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up `key`, evicting it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock();
        let now = Instant::now();

        let (value, expired) = match cache.get(key) {
            Some(entry) if entry.expires_at > now => (Some(entry.value.clone()), false),
            Some(_) => (None, true),
            None => (None, false),
        };
        if expired {
            cache.pop(key);
        }
        drop(cache);

        let mut stats = self.stats.lock();
        if value.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        if expired {
            stats.expirations += 1;
        }

        value
    }

    /// Store `value` under `key`, expiring one TTL from now.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.inner.lock().put(key, entry);
        self.stats.lock().insertions += 1;
    }

    /// Get current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Number of stored entries, expired ones not yet evicted included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K: Hash + Eq, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
