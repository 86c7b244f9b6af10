//! Manual file listing with request cancellation
//!
//! The file browser is the one read path that does not go through the
//! query cache: the user pages through their uploaded files on demand, and
//! each new request supersedes the previous one. Supersession is explicit:
//! `load` cancels the in-flight request's [`CancellationToken`] before
//! issuing its own, and a cancelled load resolves to `Ok(None)` so a late
//! response can never be applied over a newer one.

use std::sync::{Arc, Mutex};

use desksync_domain::{ApiFailure, FileRecord, Page, TenantContext};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::transport::{decode, ApiTransport};

const FILES_PATH: &str = "/documents/get-files/data";

/// One position in the file browser: page, optional search text, optional
/// selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    pub page: u32,
    pub page_size: u32,
    pub query: String,
    pub selected_file: Option<String>,
}

impl Default for FileSlot {
    fn default() -> Self {
        Self { page: 1, page_size: 20, query: String::new(), selected_file: None }
    }
}

impl FileSlot {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if !self.query.is_empty() {
            params.push(("query".to_string(), self.query.clone()));
        }
        if let Some(file) = &self.selected_file {
            params.push(("file".to_string(), file.clone()));
        }
        params
    }
}

/// Fetches file listings, one in-flight request at a time.
pub struct FileBrowser {
    transport: Arc<dyn ApiTransport>,
    active: Mutex<CancellationToken>,
}

impl FileBrowser {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport, active: Mutex::new(CancellationToken::new()) }
    }

    /// Load the listing for `slot`, cancelling any in-flight load.
    ///
    /// `Ok(None)` means this load was superseded (or cancelled) before its
    /// response arrived; the caller keeps whatever it was showing.
    pub async fn load(
        &self,
        tenant: &TenantContext,
        slot: &FileSlot,
    ) -> Result<Option<Page<FileRecord>>, ApiFailure> {
        let token = self.arm(CancellationToken::new());
        let params = slot.to_params();

        tokio::select! {
            _ = token.cancelled() => {
                debug!(page = slot.page, "file load superseded before response");
                Ok(None)
            }
            response = self.transport.get_json(tenant, FILES_PATH, &params) => {
                if token.is_cancelled() {
                    return Ok(None);
                }
                Ok(Some(decode(response?)?))
            }
        }
    }

    /// Cancel the in-flight load, if any (e.g. on view teardown).
    pub fn cancel(&self) {
        let active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        active.cancel();
    }

    /// Replace the active token, cancelling the previous one.
    fn arm(&self, token: CancellationToken) -> CancellationToken {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        active.cancel();
        *active = token.clone();
        token
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    /// Transport whose GET responses can be delayed per call.
    struct SlowTransport {
        delay: Duration,
        response: Value,
    }

    #[async_trait]
    impl ApiTransport for SlowTransport {
        async fn get_json(
            &self,
            _tenant: &TenantContext,
            _path: &str,
            params: &[(String, String)],
        ) -> Result<Value, ApiFailure> {
            tokio::time::sleep(self.delay).await;
            let mut value = self.response.clone();
            // Tag the response with the requested page so tests can tell
            // responses apart.
            if let Some(page) = params.iter().find(|(name, _)| name == "page") {
                value["current_page"] = json!(page.1.parse::<u32>().unwrap());
            }
            Ok(value)
        }

        async fn post_json(
            &self,
            _tenant: &TenantContext,
            _path: &str,
            _body: &Value,
        ) -> Result<Value, ApiFailure> {
            panic!("file browser only reads")
        }

        async fn patch_json(
            &self,
            _tenant: &TenantContext,
            _path: &str,
            _body: &Value,
        ) -> Result<Value, ApiFailure> {
            panic!("file browser only reads")
        }

        async fn delete_json(
            &self,
            _tenant: &TenantContext,
            _path: &str,
            _body: Option<&Value>,
        ) -> Result<Value, ApiFailure> {
            panic!("file browser only reads")
        }

        async fn get_bytes(
            &self,
            _tenant: &TenantContext,
            _path: &str,
            _params: &[(String, String)],
        ) -> Result<Vec<u8>, ApiFailure> {
            panic!("file browser only reads")
        }
    }

    fn listing() -> Value {
        json!({
            "items": [],
            "total_count": 0,
            "current_page": 1,
            "total_pages": 0,
            "has_next": false,
            "has_previous": false,
        })
    }

    #[tokio::test]
    async fn completed_load_returns_the_listing() {
        let browser = FileBrowser::new(Arc::new(SlowTransport {
            delay: Duration::from_millis(0),
            response: listing(),
        }));

        let result = browser
            .load(&TenantContext::new("acme"), &FileSlot::default())
            .await
            .unwrap();
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn newer_load_supersedes_the_older_one() {
        let browser = Arc::new(FileBrowser::new(Arc::new(SlowTransport {
            delay: Duration::from_millis(50),
            response: listing(),
        })));
        let tenant = TenantContext::new("acme");

        let first = {
            let browser = Arc::clone(&browser);
            let tenant = tenant.clone();
            tokio::spawn(async move {
                browser.load(&tenant, &FileSlot { page: 1, ..Default::default() }).await
            })
        };
        // Let the first request get in flight before superseding it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second =
            browser.load(&tenant, &FileSlot { page: 2, ..Default::default() }).await.unwrap();

        let first = first.await.unwrap().unwrap();
        assert!(first.is_none(), "superseded load must not deliver a page");
        assert_eq!(second.map(|page| page.current_page), Some(2));
    }

    #[tokio::test]
    async fn cancel_discards_the_in_flight_load() {
        let browser = Arc::new(FileBrowser::new(Arc::new(SlowTransport {
            delay: Duration::from_millis(50),
            response: listing(),
        })));
        let tenant = TenantContext::new("acme");

        let pending = {
            let browser = Arc::clone(&browser);
            let tenant = tenant.clone();
            tokio::spawn(async move { browser.load(&tenant, &FileSlot::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        browser.cancel();

        assert!(pending.await.unwrap().unwrap().is_none());
    }
}
