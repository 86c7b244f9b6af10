//! Per-resource-class query policies

use std::time::Duration;

/// How a query's cache entry ages and how page transitions behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPolicy {
    /// How long a cached result satisfies repeated mounts without a
    /// network call.
    pub stale_after: Duration,
    /// Keep the previous page visible while the next one is fetched, so
    /// pagination never flashes an empty state.
    pub keep_previous_data: bool,
}

impl QueryPolicy {
    /// Frequently-changing data, e.g. document search results.
    pub fn volatile() -> Self {
        Self { stale_after: Duration::from_secs(3 * 60), keep_previous_data: true }
    }

    /// Rarely-changing lookup data, e.g. department/category dropdowns.
    pub fn lookup() -> Self {
        Self { stale_after: Duration::from_secs(10 * 60), keep_previous_data: false }
    }
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self::volatile()
    }
}
