//! Keyed cache storage with staleness, prefix invalidation and generations

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use tracing::debug;

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Keys that form a hierarchy, so "everything under this parent" can be
/// matched for invalidation.
pub trait PrefixKey {
    /// Whether `prefix` is a (possibly equal) ancestor of this key.
    fn starts_with(&self, prefix: &Self) -> bool;
}

/// A cached value together with its freshness at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue<V> {
    pub value: V,
    /// Stale entries are still served so the caller can keep previous data
    /// visible, but the caller is expected to refetch.
    pub is_stale: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    stale_at: Option<Instant>,
    invalidated: bool,
}

#[derive(Debug)]
struct CacheStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    entries: HashMap<K, CacheEntry<V>>,
    /// Tracks insertion order for capacity eviction
    insertion_order: Vec<K>,
    /// Monotonic fetch generation per key; bumped by `begin_fetch`
    generations: HashMap<K, u64>,
}

impl<K, V> CacheStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self { entries: HashMap::new(), insertion_order: Vec::new(), generations: HashMap::new() }
    }
}

/// Thread-safe keyed cache for query results.
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone + PrefixKey`)
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for time-based operations (defaults to `SystemClock`)
pub struct KeyedCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone + PrefixKey,
    V: Clone,
    C: Clock,
{
    storage: Arc<RwLock<CacheStorage<K, V>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> KeyedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone + PrefixKey,
    V: Clone,
{
    /// Create a new cache with the given configuration using system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> KeyedCache<K, V, C>
where
    K: Eq + Hash + Clone + PrefixKey,
    V: Clone,
    C: Clock + Clone,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            storage: Arc::new(RwLock::new(CacheStorage::new())),
            config,
            metrics: MetricsCollector::new(),
            clock,
        }
    }

    /// Insert a value, stamping it with the configured staleness deadline.
    ///
    /// If the cache is at capacity the oldest entry is dropped first.
    pub fn insert(&self, key: K, value: V) {
        self.insert_with_staleness(key, value, self.config.stale_after);
    }

    /// Insert with an explicit staleness window, overriding the configured
    /// default. Callers with per-entry policies (short-lived search results
    /// next to long-lived lookups) use this.
    pub fn insert_with_staleness(
        &self,
        key: K,
        value: V,
        stale_after: Option<std::time::Duration>,
    ) {
        let mut storage = match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(max) = self.config.max_entries {
            if storage.entries.len() >= max && !storage.entries.contains_key(&key) {
                if let Some(oldest) = storage.insertion_order.first().cloned() {
                    storage.entries.remove(&oldest);
                    storage.insertion_order.retain(|k| k != &oldest);
                }
            }
        }

        let now = self.clock.now();
        let entry = CacheEntry {
            value,
            inserted_at: now,
            stale_at: stale_after.map(|ttl| now + ttl),
            invalidated: false,
        };

        storage.insertion_order.retain(|k| k != &key);
        storage.insertion_order.push(key.clone());
        storage.entries.insert(key, entry);

        if self.config.track_metrics {
            self.metrics.record_insert();
        }
    }

    /// Get a value along with its freshness.
    ///
    /// Returns `None` only when nothing is cached for the key. An entry past
    /// its staleness deadline or invalidated by a mutation is still returned,
    /// flagged stale.
    pub fn get(&self, key: &K) -> Option<CachedValue<V>> {
        let storage = match self.storage.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let Some(entry) = storage.entries.get(key) else {
            if self.config.track_metrics {
                self.metrics.record_miss();
            }
            return None;
        };

        let expired = entry.stale_at.is_some_and(|deadline| self.clock.now() >= deadline);
        if self.config.track_metrics {
            self.metrics.record_hit();
        }

        Some(CachedValue { value: entry.value.clone(), is_stale: entry.invalidated || expired })
    }

    /// Whether a fresh (non-stale) entry exists for the key.
    pub fn is_fresh(&self, key: &K) -> bool {
        self.get(key).is_some_and(|cached| !cached.is_stale)
    }

    /// Start a fetch for a key, returning the generation that must be
    /// presented to [`KeyedCache::complete_fetch`].
    ///
    /// Each call supersedes all earlier generations for the same key.
    pub fn begin_fetch(&self, key: &K) -> u64 {
        let mut storage = match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let generation = storage.generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Complete a fetch started with [`KeyedCache::begin_fetch`].
    ///
    /// Returns `true` and stores the value if `generation` is still current;
    /// a superseded response is discarded and `false` is returned, so an
    /// out-of-order arrival never overwrites fresher data.
    pub fn complete_fetch(&self, key: &K, generation: u64, value: V) -> bool {
        self.complete_fetch_with_staleness(key, generation, value, self.config.stale_after)
    }

    /// [`KeyedCache::complete_fetch`] with an explicit staleness window for
    /// the stored entry.
    pub fn complete_fetch_with_staleness(
        &self,
        key: &K,
        generation: u64,
        value: V,
        stale_after: Option<std::time::Duration>,
    ) -> bool {
        let current = {
            let storage = match self.storage.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            storage.generations.get(key).copied().unwrap_or(0)
        };

        if current != generation {
            if self.config.track_metrics {
                self.metrics.record_discarded_fetch();
            }
            return false;
        }

        self.insert_with_staleness(key.clone(), value, stale_after);
        true
    }

    /// Mark every entry under `prefix` stale in one atomic pass.
    ///
    /// Readers either see the cache before the invalidation or after all
    /// matching entries are stale; partial invalidation is never observable.
    /// Returns the number of entries affected.
    pub fn invalidate_prefix(&self, prefix: &K) -> usize {
        let mut storage = match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut affected = 0;
        for (key, entry) in storage.entries.iter_mut() {
            if key.starts_with(prefix) && !entry.invalidated {
                entry.invalidated = true;
                affected += 1;
            }
        }

        if affected > 0 {
            debug!(affected, "prefix invalidation marked entries stale");
            if self.config.track_metrics {
                self.metrics.record_invalidations(affected as u64);
            }
        }
        affected
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut storage = match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        storage.insertion_order.retain(|k| k != key);
        storage.entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every entry and forget all generations.
    pub fn clear(&self) {
        let mut storage = match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        storage.entries.clear();
        storage.insertion_order.clear();
        storage.generations.clear();

        if self.config.track_metrics {
            self.metrics.reset();
        }
    }

    /// Remove entries whose staleness deadline passed more than `grace` ago.
    ///
    /// Returns the number of entries removed.
    pub fn purge_stale(&self, grace: std::time::Duration) -> usize {
        let now = self.clock.now();
        let mut storage = match self.storage.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let keys_to_remove: Vec<K> = storage
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry.stale_at.is_some_and(|deadline| now >= deadline + grace)
                    || (entry.invalidated && now >= entry.inserted_at + grace)
            })
            .map(|(k, _)| k.clone())
            .collect();

        for key in &keys_to_remove {
            storage.entries.remove(key);
            storage.insertion_order.retain(|k| k != key);
        }

        if !keys_to_remove.is_empty() {
            debug!(removed = keys_to_remove.len(), "purged stale cache entries");
        }
        keys_to_remove.len()
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        match self.storage.read() {
            Ok(guard) => guard.entries.len(),
            Err(poisoned) => poisoned.into_inner().entries.len(),
        }
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len(), self.config.max_entries)
    }
}

impl<K, V, C> Clone for KeyedCache<K, V, C>
where
    K: Eq + Hash + Clone + PrefixKey,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
