//! Access token provisioning
//!
//! The transport asks this port for a bearer token before every request.
//! Token acquisition and refresh live behind the trait; the transport
//! neither stores nor inspects tokens.

use async_trait::async_trait;
use desksync_domain::DeskSyncError;

/// Source of bearer tokens for API requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A currently valid access token. Implementations refresh as needed.
    async fn access_token(&self) -> Result<String, DeskSyncError>;
}

/// Fixed-token provider for tests and service-account deployments.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, DeskSyncError> {
        if self.token.is_empty() {
            return Err(DeskSyncError::Auth("no access token configured".into()));
        }
        Ok(self.token.clone())
    }
}
