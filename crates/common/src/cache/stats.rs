//! Cache statistics and metrics tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,

    /// Maximum allowed entries (None = unlimited)
    pub max_entries: Option<usize>,

    /// Total number of get operations that found an entry (fresh or stale)
    pub hits: u64,

    /// Total number of get operations that found nothing
    pub misses: u64,

    /// Total number of insert operations
    pub inserts: u64,

    /// Total number of entries marked stale by prefix invalidation
    pub invalidations: u64,

    /// Total number of fetch completions discarded as superseded
    pub discarded_fetches: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total accesses)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of access operations (hits + misses)
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Thread-safe metrics collector using atomic counters, so reads never
/// contend with the storage lock.
#[derive(Debug, Default)]
pub(crate) struct MetricsCollector {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    inserts: Arc<AtomicU64>,
    invalidations: Arc<AtomicU64>,
    discarded_fetches: Arc<AtomicU64>,
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
            inserts: Arc::clone(&self.inserts),
            invalidations: Arc::clone(&self.invalidations),
            discarded_fetches: Arc::clone(&self.discarded_fetches),
        }
    }
}

impl MetricsCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalidations(&self, count: u64) {
        self.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded_fetch(&self) {
        self.discarded_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
        self.discarded_fetches.store(0, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, size: usize, max_entries: Option<usize>) -> CacheStats {
        CacheStats {
            size,
            max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            discarded_fetches: self.discarded_fetches.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::stats.
    use super::*;

    #[test]
    fn hit_rate_with_no_accesses_is_zero() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_reflects_recorded_accesses() {
        let collector = MetricsCollector::new();
        collector.record_hit();
        collector.record_hit();
        collector.record_miss();

        let stats = collector.snapshot(2, None);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 2.0 / 3.0);
        assert_eq!(stats.total_accesses(), 3);
    }

    #[test]
    fn reset_clears_counters() {
        let collector = MetricsCollector::new();
        collector.record_insert();
        collector.record_invalidations(4);
        collector.reset();

        let stats = collector.snapshot(0, None);
        assert_eq!(stats.inserts, 0);
        assert_eq!(stats.invalidations, 0);
    }
}
