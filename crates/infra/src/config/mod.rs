//! Configuration types and loading

mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};

use serde::{Deserialize, Serialize};

/// Connection settings for the backend API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per request (initial try + retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// First retry delay; doubles on each subsequent retry.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_backoff_ms() -> u64 {
    200
}
