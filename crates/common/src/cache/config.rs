//! Cache configuration

use std::time::Duration;

/// Configuration for cache behavior
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default staleness deadline for entries inserted without an explicit
    /// one (None = entries never go stale on their own)
    pub stale_after: Option<Duration>,

    /// Maximum number of entries; the oldest entry is dropped when the
    /// cache is full (None = unlimited)
    pub max_entries: Option<usize>,

    /// Whether to collect hit/miss/invalidation metrics
    pub track_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { stale_after: None, max_entries: None, track_metrics: false }
    }
}

impl CacheConfig {
    /// Create a new configuration builder
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Quick preset for a staleness-window cache
    pub fn stale_after(duration: Duration) -> Self {
        Self { stale_after: Some(duration), max_entries: None, track_metrics: false }
    }

    /// Staleness window combined with a size bound
    pub fn bounded(stale_after: Duration, max_entries: usize) -> Self {
        Self { stale_after: Some(stale_after), max_entries: Some(max_entries), track_metrics: false }
    }
}

/// Builder for CacheConfig with fluent API
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default staleness deadline
    pub fn stale_after(mut self, duration: Duration) -> Self {
        self.config.stale_after = Some(duration);
        self
    }

    /// Set maximum number of entries
    pub fn max_entries(mut self, count: usize) -> Self {
        self.config.max_entries = Some(count);
        self
    }

    /// Enable or disable metrics tracking
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}
