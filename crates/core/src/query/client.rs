//! Cached query execution
//!
//! [`QueryClient`] is the single owner of the process-wide query cache.
//! Reads go through [`QueryClient::fetch`]: a fresh cache hit is returned
//! without network I/O, anything else runs the supplied fetch closure under
//! a per-key generation so superseded responses are discarded on arrival.
//! Mutations call [`QueryClient::invalidate`] with a parent key to mark
//! every page and filter variant of a resource stale in one atomic pass.

use std::future::Future;

use desksync_common::cache::{CacheConfig, CacheStats, KeyedCache};
use desksync_common::time::{Clock, SystemClock};
use desksync_domain::ApiFailure;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::key::QueryKey;
use super::policy::QueryPolicy;
use crate::transport::decode;

/// Why a query did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The key is not tenant-scoped; no fetch was attempted.
    #[error("query disabled: tenant scope is missing")]
    Disabled,

    /// The fetch ran and failed.
    #[error(transparent)]
    Api(#[from] ApiFailure),
}

/// Where the returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Network,
}

/// A successful query result.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: T,
    pub source: DataSource,
}

/// Cached query executor shared by all resource services.
///
/// Values are stored type-erased as JSON so one cache spans every resource,
/// which is what lets a single prefix invalidation cover all of a
/// resource's operations.
pub struct QueryClient<C = SystemClock>
where
    C: Clock + Clone,
{
    cache: KeyedCache<QueryKey, Value, C>,
}

impl QueryClient<SystemClock> {
    /// Client over the system clock with metrics enabled.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for QueryClient<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> QueryClient<C>
where
    C: Clock + Clone,
{
    /// Client with a custom clock (useful for testing staleness windows).
    pub fn with_clock(clock: C) -> Self {
        let config = CacheConfig::builder().track_metrics(true).build();
        Self { cache: KeyedCache::with_clock(config, clock) }
    }

    /// Run a query: serve a fresh cache hit, otherwise fetch and store.
    ///
    /// Returns [`QueryError::Disabled`] without touching the network when
    /// the key is not tenant-scoped. A fetch that is superseded before its
    /// response arrives still returns its own data to its own caller, but
    /// the cache keeps the newer generation's value.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        policy: &QueryPolicy,
        fetch_fn: F,
    ) -> Result<QueryResult<T>, QueryError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiFailure>>,
    {
        if !key.is_fetchable() {
            return Err(QueryError::Disabled);
        }

        if let Some(cached) = self.cache.get(key) {
            if !cached.is_stale {
                let data = decode(cached.value)?;
                return Ok(QueryResult { data, source: DataSource::Cache });
            }
        }

        let generation = self.cache.begin_fetch(key);
        let data = fetch_fn().await?;

        let value = serde_json::to_value(&data)
            .map_err(|err| ApiFailure::Transport(format!("failed to encode cache entry: {err}")))?;
        let applied = self.cache.complete_fetch_with_staleness(
            key,
            generation,
            value,
            Some(policy.stale_after),
        );
        if !applied {
            debug!(key = %key, "fetch superseded; response not cached");
        }

        Ok(QueryResult { data, source: DataSource::Network })
    }

    /// Warm the cache for a probable next query.
    ///
    /// Uses the same key and policy as the corresponding read, so a later
    /// [`QueryClient::fetch`] finds the warm entry. Failures are silent:
    /// a prefetch is an optimization, never a required operation.
    pub async fn prefetch<T, F, Fut>(&self, key: &QueryKey, policy: &QueryPolicy, fetch_fn: F)
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiFailure>>,
    {
        if !key.is_fetchable() || self.cache.is_fresh(key) {
            return;
        }

        if let Err(error) = self.fetch::<T, F, Fut>(key, policy, fetch_fn).await {
            debug!(key = %key, %error, "prefetch failed; ignoring");
        }
    }

    /// Mark everything under `prefix` stale. Atomic: a reader sees either
    /// none or all of the affected entries invalidated.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.cache.invalidate_prefix(prefix)
    }

    /// Look at a cached value without fetching.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let cached = self.cache.get(key)?;
        decode(cached.value).ok()
    }

    /// Whether a fresh entry exists for the key.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.cache.is_fresh(key)
    }

    /// Cache statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached state (e.g. on logout).
    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl<C> Clone for QueryClient<C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self { cache: self.cache.clone() }
    }
}
