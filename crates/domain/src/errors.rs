//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for DeskSync
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DeskSyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for DeskSync operations
pub type Result<T> = std::result::Result<T, DeskSyncError>;

/// Outcome of an API call once the response envelope has been interpreted.
///
/// The backend reports application-level failures inside an HTTP 200 envelope
/// (`success: false` plus a localized message) while transport-level failures
/// surface as network errors or non-2xx statuses. Both are one typed failure
/// here so call sites handle them through a single path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The backend processed the request and rejected it. The message is
    /// already localized and safe to show verbatim.
    #[error("{0}")]
    App(String),

    /// The request never produced a usable envelope: network failure,
    /// timeout, non-2xx status, or a malformed response body.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ApiFailure {
    /// Message suitable for direct display to the user.
    ///
    /// Application failures carry their own localized text; transport
    /// failures fall back to a generic notice so internals never leak.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::App(message) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether this failure came from the application envelope rather than
    /// the transport layer.
    pub fn is_app_failure(&self) -> bool {
        matches!(self, Self::App(_))
    }
}

impl From<ApiFailure> for DeskSyncError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::App(message) => DeskSyncError::InvalidInput(message),
            ApiFailure::Transport(message) => DeskSyncError::Network(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_failure_exposes_server_message() {
        let failure = ApiFailure::App("Name already in use".into());
        assert_eq!(failure.user_message("fallback"), "Name already in use");
        assert!(failure.is_app_failure());
    }

    #[test]
    fn transport_failure_uses_fallback_message() {
        let failure = ApiFailure::Transport("connection reset".into());
        assert_eq!(failure.user_message("Something went wrong"), "Something went wrong");
        assert!(!failure.is_app_failure());
    }

    #[test]
    fn empty_app_message_uses_fallback() {
        let failure = ApiFailure::App(String::new());
        assert_eq!(failure.user_message("fallback"), "fallback");
    }
}
