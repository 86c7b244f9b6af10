//! End-to-end data-sync behavior over an in-memory backend
//!
//! These tests exercise the full read/mutate/invalidate loop the way the
//! admin front-end drives it: cached searches, deletions that reconcile
//! the cache, and tenant isolation, all against a transport double that
//! behaves like the real backend (pagination, filtering, deletions).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use desksync_core::mutation::{MutationState, GENERIC_FAILURE_NOTICE};
use desksync_core::notify::{NoticeKind, RecordingNotifier};
use desksync_core::query::{DataSource, QueryClient, QueryError};
use desksync_core::resources::DocumentService;
use desksync_core::transport::ApiTransport;
use desksync_domain::{
    ApiFailure, Document, DocumentDeletion, DocumentSearchFilter, DocumentStatus, Page,
    TenantContext,
};
use serde_json::{json, Value};

const SEARCH_PATH: &str = "/documents/search-documents";
const DELETE_PATH: &str = "/documents/delete-doc-by-id";

/// In-memory document backend keyed by tenant.
struct StoreTransport {
    docs: Mutex<HashMap<String, Vec<Document>>>,
    search_hits: AtomicUsize,
    delete_bodies: Mutex<Vec<Value>>,
    fail_deletes_with: Mutex<Option<ApiFailure>>,
    reject_unknown_tenants: AtomicBool,
}

impl StoreTransport {
    fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            search_hits: AtomicUsize::new(0),
            delete_bodies: Mutex::new(Vec::new()),
            fail_deletes_with: Mutex::new(None),
            reject_unknown_tenants: AtomicBool::new(false),
        }
    }

    fn seed(&self, tenant: &str, count: usize) {
        let docs = (0..count)
            .map(|index| Document {
                id: format!("{tenant}-doc-{index}"),
                title: format!("Handbook {index}"),
                file_name: None,
                department_id: None,
                category_id: None,
                status: DocumentStatus::Published,
                updated_at: Utc::now(),
            })
            .collect();
        self.docs.lock().unwrap().insert(tenant.to_string(), docs);
    }

    fn search_hits(&self) -> usize {
        self.search_hits.load(Ordering::SeqCst)
    }

    fn fail_deletes(&self, failure: ApiFailure) {
        *self.fail_deletes_with.lock().unwrap() = Some(failure);
    }

    fn delete_bodies(&self) -> Vec<Value> {
        self.delete_bodies.lock().unwrap().clone()
    }

    fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
        params.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

#[async_trait]
impl ApiTransport for StoreTransport {
    async fn get_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, ApiFailure> {
        assert_eq!(path, SEARCH_PATH, "unexpected GET path {path}");
        self.search_hits.fetch_add(1, Ordering::SeqCst);

        let docs = self.docs.lock().unwrap();
        if self.reject_unknown_tenants.load(Ordering::SeqCst)
            && !docs.contains_key(&tenant.tenant_id)
        {
            return Err(ApiFailure::App("Unknown tenant".into()));
        }
        let all = docs.get(&tenant.tenant_id).cloned().unwrap_or_default();

        let query = Self::param(params, "query").unwrap_or_default().to_lowercase();
        let matching: Vec<Document> = all
            .into_iter()
            .filter(|doc| query.is_empty() || doc.title.to_lowercase().contains(&query))
            .collect();

        let page: u32 = Self::param(params, "page").and_then(|v| v.parse().ok()).unwrap_or(1);
        let size: u32 =
            Self::param(params, "page_size").and_then(|v| v.parse().ok()).unwrap_or(10);
        let start = ((page.max(1) - 1) * size) as usize;
        let items: Vec<Document> =
            matching.iter().skip(start).take(size as usize).cloned().collect();
        let total = matching.len() as u64;

        let body = Page::new(items, total, page, size);
        serde_json::to_value(body).map_err(|err| ApiFailure::Transport(err.to_string()))
    }

    async fn post_json(
        &self,
        _tenant: &TenantContext,
        path: &str,
        _body: &Value,
    ) -> Result<Value, ApiFailure> {
        panic!("unexpected POST to {path}");
    }

    async fn patch_json(
        &self,
        _tenant: &TenantContext,
        path: &str,
        _body: &Value,
    ) -> Result<Value, ApiFailure> {
        panic!("unexpected PATCH to {path}");
    }

    async fn delete_json(
        &self,
        tenant: &TenantContext,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiFailure> {
        assert_eq!(path, DELETE_PATH, "unexpected DELETE path {path}");
        let body = body.cloned().unwrap_or(Value::Null);
        self.delete_bodies.lock().unwrap().push(body.clone());

        if let Some(failure) = self.fail_deletes_with.lock().unwrap().clone() {
            return Err(failure);
        }

        let ids: Vec<String> = if let Some(id) = body.get("id").and_then(Value::as_str) {
            vec![id.to_string()]
        } else {
            body.get("ids")
                .and_then(Value::as_array)
                .map(|ids| {
                    ids.iter().filter_map(Value::as_str).map(str::to_string).collect()
                })
                .unwrap_or_default()
        };

        let mut docs = self.docs.lock().unwrap();
        if let Some(tenant_docs) = docs.get_mut(&tenant.tenant_id) {
            tenant_docs.retain(|doc| !ids.contains(&doc.id));
        }
        Ok(Value::Null)
    }

    async fn get_bytes(
        &self,
        _tenant: &TenantContext,
        path: &str,
        _params: &[(String, String)],
    ) -> Result<Vec<u8>, ApiFailure> {
        panic!("unexpected binary GET to {path}");
    }
}

struct Harness {
    transport: Arc<StoreTransport>,
    notifier: Arc<RecordingNotifier>,
    service: DocumentService,
}

fn harness() -> Harness {
    let transport = Arc::new(StoreTransport::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = DocumentService::new(
        QueryClient::new(),
        Arc::clone(&transport) as Arc<dyn ApiTransport>,
        Arc::clone(&notifier) as Arc<dyn desksync_core::notify::Notifier>,
    );
    Harness { transport, notifier, service }
}

#[tokio::test]
async fn repeated_search_is_served_from_cache() {
    let h = harness();
    h.transport.seed("acme", 12);
    let tenant = TenantContext::new("acme");
    let filter = DocumentSearchFilter::default();

    let first = h.service.search(&tenant, &filter).await.unwrap();
    let second = h.service.search(&tenant, &filter).await.unwrap();

    assert_eq!(first.source, DataSource::Network);
    assert_eq!(second.source, DataSource::Cache);
    assert_eq!(second.data.items, first.data.items);
    assert_eq!(h.transport.search_hits(), 1);
}

#[tokio::test]
async fn deletion_invalidates_every_cached_page() {
    let h = harness();
    h.transport.seed("acme", 25);
    let tenant = TenantContext::new("acme");

    // Cache three pages of the same search.
    for page in 1..=3 {
        let filter = DocumentSearchFilter { page, ..Default::default() };
        h.service.search(&tenant, &filter).await.unwrap();
    }
    assert_eq!(h.transport.search_hits(), 3);

    h.service
        .delete(&tenant, &DocumentDeletion::Single("acme-doc-0".into()), &MutationState::new())
        .await
        .unwrap();

    // Every page refetches; none is served from the pre-deletion cache.
    for page in 1..=3 {
        let filter = DocumentSearchFilter { page, ..Default::default() };
        let result = h.service.search(&tenant, &filter).await.unwrap();
        assert_eq!(result.source, DataSource::Network);
    }
    assert_eq!(h.transport.search_hits(), 6);
}

#[tokio::test]
async fn failed_deletion_leaves_the_cache_intact() {
    let h = harness();
    h.transport.seed("acme", 5);
    let tenant = TenantContext::new("acme");
    let filter = DocumentSearchFilter::default();

    h.service.search(&tenant, &filter).await.unwrap();
    h.transport.fail_deletes(ApiFailure::App("Document is referenced by a workflow".into()));

    let result = h
        .service
        .delete(&tenant, &DocumentDeletion::Single("acme-doc-1".into()), &MutationState::new())
        .await;
    assert!(result.is_err());

    // The cached page is still fresh: no refetch, pre-mutation rows shown.
    let again = h.service.search(&tenant, &filter).await.unwrap();
    assert_eq!(again.source, DataSource::Cache);
    assert_eq!(h.transport.search_hits(), 1);
    assert_eq!(
        h.notifier.messages_of(NoticeKind::Error),
        vec!["Document is referenced by a workflow".to_string()]
    );
}

#[tokio::test]
async fn transport_failure_shows_the_generic_notice() {
    let h = harness();
    h.transport.seed("acme", 2);
    let tenant = TenantContext::new("acme");
    h.transport.fail_deletes(ApiFailure::Transport("connection reset by peer".into()));

    let result = h
        .service
        .delete(&tenant, &DocumentDeletion::Single("acme-doc-0".into()), &MutationState::new())
        .await;

    assert!(result.is_err());
    assert_eq!(
        h.notifier.messages_of(NoticeKind::Error),
        vec![GENERIC_FAILURE_NOTICE.to_string()]
    );
}

#[tokio::test]
async fn single_deletion_sends_scalar_and_singular_notice() {
    let h = harness();
    h.transport.seed("acme", 3);
    let tenant = TenantContext::new("acme");

    h.service
        .delete(&tenant, &DocumentDeletion::Single("acme-doc-2".into()), &MutationState::new())
        .await
        .unwrap();

    assert_eq!(h.transport.delete_bodies(), vec![json!({ "id": "acme-doc-2" })]);
    assert_eq!(
        h.notifier.messages_of(NoticeKind::Success),
        vec!["Document deleted.".to_string()]
    );
}

#[tokio::test]
async fn bulk_deletion_sends_array_and_pluralized_notice() {
    let h = harness();
    h.transport.seed("acme", 5);
    let tenant = TenantContext::new("acme");

    h.service
        .delete(
            &tenant,
            &DocumentDeletion::Many(vec!["acme-doc-0".into(), "acme-doc-3".into()]),
            &MutationState::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        h.transport.delete_bodies(),
        vec![json!({ "ids": ["acme-doc-0", "acme-doc-3"] })]
    );
    assert_eq!(
        h.notifier.messages_of(NoticeKind::Success),
        vec!["2 documents deleted.".to_string()]
    );
}

#[tokio::test]
async fn search_delete_requery_reflects_the_new_totals() {
    let h = harness();
    h.transport.seed("acme", 12);
    let tenant = TenantContext::new("acme");
    let filter = DocumentSearchFilter::default();

    let before = h.service.search(&tenant, &filter).await.unwrap().data;
    assert_eq!(before.total_count, 12);
    assert_eq!(before.total_pages, 2);

    h.service
        .delete(
            &tenant,
            &DocumentDeletion::Many(vec!["acme-doc-0".into(), "acme-doc-1".into()]),
            &MutationState::new(),
        )
        .await
        .unwrap();

    let after = h.service.search(&tenant, &filter).await.unwrap();
    assert_eq!(after.source, DataSource::Network);
    assert_eq!(after.data.total_count, 10);
    assert_eq!(after.data.total_pages, 1);
    assert!(!after.data.has_next);
}

#[tokio::test]
async fn tenants_never_share_cache_entries_or_invalidations() {
    let transport = Arc::new(StoreTransport::new());
    transport.seed("acme", 4);
    transport.seed("globex", 7);
    let notifier = Arc::new(RecordingNotifier::new());
    let service = DocumentService::new(
        QueryClient::new(),
        Arc::clone(&transport) as Arc<dyn ApiTransport>,
        notifier as Arc<dyn desksync_core::notify::Notifier>,
    );
    let acme = TenantContext::new("acme");
    let globex = TenantContext::new("globex");
    let filter = DocumentSearchFilter::default();

    let acme_page = service.search(&acme, &filter).await.unwrap().data;
    let globex_page = service.search(&globex, &filter).await.unwrap().data;
    assert_eq!(acme_page.total_count, 4);
    assert_eq!(globex_page.total_count, 7);
    assert_eq!(transport.search_hits(), 2);

    // A deletion in acme must not disturb globex's cached page.
    service
        .delete(&acme, &DocumentDeletion::Single("acme-doc-0".into()), &MutationState::new())
        .await
        .unwrap();

    let globex_again = service.search(&globex, &filter).await.unwrap();
    assert_eq!(globex_again.source, DataSource::Cache);
    assert_eq!(transport.search_hits(), 2);

    let acme_again = service.search(&acme, &filter).await.unwrap();
    assert_eq!(acme_again.source, DataSource::Network);
    assert_eq!(acme_again.data.total_count, 3);
}

#[tokio::test]
async fn unknown_tenant_rejection_is_surfaced_and_never_cached() {
    let h = harness();
    h.transport.seed("acme", 3);
    h.transport.reject_unknown_tenants.store(true, Ordering::SeqCst);
    let ghost = TenantContext::new("ghost");
    let filter = DocumentSearchFilter::default();

    let result = h.service.search(&ghost, &filter).await;
    assert!(matches!(result, Err(QueryError::Api(ApiFailure::App(_)))));

    // Failures are never cached: the next attempt hits the backend again.
    let again = h.service.search(&ghost, &filter).await;
    assert!(again.is_err());
    assert_eq!(h.transport.search_hits(), 2);
}

#[tokio::test]
async fn unresolved_tenant_never_touches_the_network() {
    let h = harness();
    h.transport.seed("acme", 3);

    let result =
        h.service.search(&TenantContext::unresolved(), &DocumentSearchFilter::default()).await;

    assert!(result.is_err());
    assert_eq!(h.transport.search_hits(), 0);
}
