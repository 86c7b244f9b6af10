//! Infra-level error types and conversions

use desksync_domain::DeskSyncError;
use thiserror::Error;

/// Errors raised inside the infra adapters before they cross a port
/// boundary.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("http error: {0}")]
    Http(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<InfraError> for DeskSyncError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Http(message) => DeskSyncError::Network(message),
            InfraError::Config(message) => DeskSyncError::Config(message),
        }
    }
}
