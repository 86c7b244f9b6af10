//! REST transport over the backend envelope
//!
//! Implements the core [`ApiTransport`] port. Every request carries the
//! tenant id in `X-Tenant-ID` and a bearer token from the
//! [`AccessTokenProvider`]; every JSON response is interpreted through the
//! `{success, data, message}` envelope:
//! - 2xx with `success: true` yields the `data` payload;
//! - 2xx with `success: false` becomes [`ApiFailure::App`] carrying the
//!   server's message;
//! - non-2xx statuses, network failures and malformed bodies become
//!   [`ApiFailure::Transport`] with a description that never includes
//!   response internals.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use desksync_core::transport::ApiTransport;
use desksync_domain::{ApiFailure, DeskSyncError, TenantContext};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::auth::AccessTokenProvider;
use crate::config::ApiConfig;
use crate::http::HttpClient;

const TENANT_HEADER: &str = "X-Tenant-ID";

/// Wire shape of every JSON response from the backend.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Reqwest-backed implementation of the core transport port.
pub struct RestTransport {
    http: HttpClient,
    base_url: String,
    auth: Arc<dyn AccessTokenProvider>,
}

impl RestTransport {
    /// Build a transport from configuration, constructing the retrying
    /// HTTP client internally.
    pub fn new(
        config: &ApiConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, DeskSyncError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(config.base_backoff_ms))
            .build()?;
        Ok(Self::with_http_client(http, config.base_url.clone(), auth))
    }

    /// Build a transport around an existing [`HttpClient`].
    pub fn with_http_client(
        http: HttpClient,
        base_url: impl Into<String>,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, auth }
    }

    async fn authed_request(
        &self,
        method: Method,
        tenant: &TenantContext,
        path: &str,
    ) -> Result<RequestBuilder, ApiFailure> {
        let token = self
            .auth
            .access_token()
            .await
            .map_err(|err| ApiFailure::Transport(format!("token acquisition failed: {err}")))?;

        let url = format!("{}{}", self.base_url, path);
        Ok(self
            .http
            .request(method, &url)
            .header(TENANT_HEADER, &tenant.tenant_id)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json"))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiFailure> {
        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| ApiFailure::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "request rejected by server");
            return Err(ApiFailure::Transport(format!("server responded with status {status}")));
        }
        Ok(response)
    }

    async fn into_data(response: Response) -> Result<Value, ApiFailure> {
        // DELETE endpoints may answer 204 with no envelope at all.
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|_| ApiFailure::Transport("malformed response envelope".into()))?;

        if !envelope.success {
            return Err(ApiFailure::App(envelope.message.unwrap_or_default()));
        }
        Ok(envelope.data)
    }

    async fn send_json(
        &self,
        method: Method,
        tenant: &TenantContext,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiFailure> {
        let mut request = self.authed_request(method, tenant, path).await?;
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.execute(request).await?;
        Self::into_data(response).await
    }
}

#[async_trait]
impl ApiTransport for RestTransport {
    async fn get_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, ApiFailure> {
        self.send_json(Method::GET, tenant, path, params, None).await
    }

    async fn post_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: &Value,
    ) -> Result<Value, ApiFailure> {
        self.send_json(Method::POST, tenant, path, &[], Some(body)).await
    }

    async fn patch_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: &Value,
    ) -> Result<Value, ApiFailure> {
        self.send_json(Method::PATCH, tenant, path, &[], Some(body)).await
    }

    async fn delete_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiFailure> {
        self.send_json(Method::DELETE, tenant, path, &[], body).await
    }

    async fn get_bytes(
        &self,
        tenant: &TenantContext,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<u8>, ApiFailure> {
        let mut request = self.authed_request(Method::GET, tenant, path).await?;
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|_| ApiFailure::Transport("failed to read response body".into()))?;
        Ok(bytes.to_vec())
    }
}
