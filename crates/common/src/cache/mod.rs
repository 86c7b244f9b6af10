//! Keyed query cache with staleness and prefix invalidation
//!
//! This module provides the cache the data-sync layer sits on. It differs
//! from a plain TTL map in three ways that the sync contract depends on:
//!
//! - **Staleness, not eviction**: entries past their deadline are still
//!   returned (marked stale) so callers can keep showing the previous page
//!   while a refetch runs. [`KeyedCache::purge_stale`] reclaims them.
//! - **Prefix invalidation**: [`KeyedCache::invalidate_prefix`] marks every
//!   entry under a hierarchical key prefix stale in one atomic pass, which is
//!   how a successful mutation forces all pages and filter variants of a
//!   resource to refetch.
//! - **Fetch generations**: [`KeyedCache::begin_fetch`] hands out a
//!   per-key generation; [`KeyedCache::complete_fetch`] discards responses
//!   from superseded requests so an out-of-order arrival never overwrites
//!   fresher data.
//!
//! Time is injected via the [`crate::time::Clock`] trait, so staleness is
//! fully deterministic under test with `MockClock`.

mod config;
mod stats;
mod store;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use stats::CacheStats;
pub use store::{CachedValue, KeyedCache, PrefixKey};
