//! # DeskSync Infra
//!
//! Adapters behind the core's ports:
//! - [`http::HttpClient`]: reqwest wrapper with bounded retry and
//!   exponential backoff
//! - [`api::RestTransport`]: the core transport port against the backend's
//!   `{success, data, message}` envelope, with tenant header and bearer
//!   token injection
//! - [`config`]: environment-first configuration loading with file
//!   fallback
//! - [`notify::TracingNotifier`]: notice sink backed by `tracing`
//!
//! Nothing in `core` knows about reqwest or the wire format; this crate is
//! where those details live.

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod notify;

pub use api::{AccessTokenProvider, RestTransport, StaticTokenProvider};
pub use config::ApiConfig;
pub use errors::InfraError;
pub use http::HttpClient;
pub use notify::TracingNotifier;
