use std::time::Duration;

use desksync_domain::DeskSyncError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Why a failed attempt is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryReason {
    /// The backend answered 5xx; the request itself is presumed fine.
    ServerError,
    /// The request never completed: connect failure or timeout.
    ConnectionFailed,
}

/// Classify one attempt outcome. `None` means the outcome is final, whether
/// it succeeded or not: 2xx-4xx responses and non-transient errors are
/// handed back to the caller as-is.
fn retry_reason(outcome: &Result<Response, reqwest::Error>) -> Option<RetryReason> {
    match outcome {
        Ok(response) if response.status().is_server_error() => Some(RetryReason::ServerError),
        Ok(_) => None,
        Err(err) if err.is_timeout() || err.is_connect() || err.is_request() => {
            Some(RetryReason::ConnectionFailed)
        }
        Err(_) => None,
    }
}

/// Exponential backoff schedule: the delay doubles per retry, with the
/// exponent capped so long outages do not produce absurd waits.
#[derive(Debug, Clone, Copy)]
struct Backoff {
    base: Duration,
}

impl Backoff {
    const MAX_EXPONENT: u32 = 8;

    fn delay(&self, retry: usize) -> Duration {
        let exponent = (retry.saturating_sub(1) as u32).min(Self::MAX_EXPONENT);
        self.base.saturating_mul(1 << exponent)
    }
}

fn http_error(err: reqwest::Error) -> DeskSyncError {
    DeskSyncError::from(InfraError::from(err))
}

/// HTTP client with bounded retry and exponential backoff.
///
/// Server errors (5xx) and transient network failures are retried up to
/// `max_attempts` total tries; everything else, client errors included, is
/// returned as-is so callers can interpret the status themselves.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    backoff: Backoff,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, DeskSyncError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Each attempt rebuilds the request from the builder, so the body must
    /// be cloneable (buffered, not streamed).
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, DeskSyncError> {
        let mut failed = 0usize;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    DeskSyncError::Internal(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(http_error)?;

            debug!(
                attempt = failed + 1,
                method = %request.method(),
                url = %request.url(),
                "dispatching request"
            );
            let outcome = self.client.execute(request).await;

            match retry_reason(&outcome) {
                Some(reason) if failed + 1 < self.max_attempts => {
                    failed += 1;
                    let delay = self.backoff.delay(failed);
                    debug!(?reason, retry = failed, ?delay, "attempt failed; backing off");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                _ => return outcome.map_err(http_error),
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, DeskSyncError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(http_error)?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            backoff: Backoff { base: self.base_backoff },
        })
    }
}
