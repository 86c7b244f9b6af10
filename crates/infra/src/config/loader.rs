//! Configuration loader
//!
//! Environment variables win; a config file is the fallback.
//!
//! ## Environment Variables
//! - `DESKSYNC_API_BASE_URL`: backend base URL (required)
//! - `DESKSYNC_API_TIMEOUT_SECS`: per-request timeout (default 30)
//! - `DESKSYNC_API_MAX_ATTEMPTS`: total attempts per request (default 3)
//! - `DESKSYNC_API_BASE_BACKOFF_MS`: first retry delay (default 200)
//!
//! ## File Locations
//! When no explicit path is given, the loader probes (in order):
//! `./config.{toml,json}`, `./desksync.{toml,json}`, the same names one
//! and two directories up, and next to the executable.

use std::path::{Path, PathBuf};

use desksync_domain::{DeskSyncError, Result};
use serde::Deserialize;
use url::Url;

use super::ApiConfig;

/// Load configuration, environment first, file fallback.
pub fn load() -> Result<ApiConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// `DESKSYNC_API_BASE_URL` is required; everything else defaults.
pub fn load_from_env() -> Result<ApiConfig> {
    let base_url = env_var("DESKSYNC_API_BASE_URL")?;
    let timeout_secs = env_parsed("DESKSYNC_API_TIMEOUT_SECS", 30)?;
    let max_attempts = env_parsed("DESKSYNC_API_MAX_ATTEMPTS", 3)?;
    let base_backoff_ms = env_parsed("DESKSYNC_API_BASE_BACKOFF_MS", 200)?;

    validate(ApiConfig { base_url, timeout_secs, max_attempts, base_backoff_ms })
}

/// Load configuration from a file, probing standard locations when no
/// path is given. Format is detected by extension (`.toml` or `.json`).
pub fn load_from_file(path: Option<PathBuf>) -> Result<ApiConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DeskSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DeskSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DeskSyncError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// On-disk layout: the API settings live under an `[api]` table.
#[derive(Debug, Deserialize)]
struct FileConfig {
    api: ApiConfig,
}

fn parse_config(contents: &str, path: &Path) -> Result<ApiConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    let file: FileConfig = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DeskSyncError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| DeskSyncError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => {
            return Err(DeskSyncError::Config(format!(
                "Unsupported config format: {}",
                extension
            )))
        }
    };
    Ok(file.api)
}

fn validate(config: ApiConfig) -> Result<ApiConfig> {
    Url::parse(&config.base_url)
        .map_err(|e| DeskSyncError::Config(format!("Invalid base URL: {}", e)))?;
    if config.max_attempts == 0 {
        return Err(DeskSyncError::Config("max_attempts must be at least 1".into()));
    }
    Ok(config)
}

/// Probe the standard config file locations, first hit wins.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.toml", "config.json", "desksync.toml", "desksync.json"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "../", "../../"] {
            for name in names {
                candidates.push(cwd.join(format!("{prefix}{name}")));
            }
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            for name in names {
                candidates.push(exe_dir.join(name));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        DeskSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| DeskSyncError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
