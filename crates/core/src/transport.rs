//! Transport port for the backend REST API
//!
//! The core never talks HTTP directly; it goes through [`ApiTransport`],
//! implemented in `desksync-infra`. Implementations are responsible for the
//! tenant header, bearer token, and envelope interpretation: by the time a
//! call returns here, `success: false` has already become
//! [`ApiFailure::App`] and any network or status problem
//! [`ApiFailure::Transport`].

use async_trait::async_trait;
use desksync_domain::{ApiFailure, TenantContext};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON-level access to the backend API.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// GET a JSON endpoint; returns the envelope's `data` payload.
    async fn get_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, ApiFailure>;

    /// POST a JSON body; returns the envelope's `data` payload.
    async fn post_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: &Value,
    ) -> Result<Value, ApiFailure>;

    /// PATCH a JSON body; returns the envelope's `data` payload.
    async fn patch_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: &Value,
    ) -> Result<Value, ApiFailure>;

    /// DELETE with an optional JSON body; returns the envelope's `data`.
    async fn delete_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiFailure>;

    /// GET a binary endpoint; returns the raw response bytes (no envelope).
    async fn get_bytes(
        &self,
        tenant: &TenantContext,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<u8>, ApiFailure>;
}

/// Decode an envelope `data` payload into a typed DTO.
///
/// The network boundary is the one place shape assumptions can silently
/// break, so decoding failures are surfaced as transport failures rather
/// than panics or nulls.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiFailure> {
    serde_json::from_value(value)
        .map_err(|err| ApiFailure::Transport(format!("unexpected response shape: {err}")))
}
