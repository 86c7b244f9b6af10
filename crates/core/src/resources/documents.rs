//! Document search, update, deletion and tenant analytics

use std::sync::Arc;

use desksync_common::time::{Clock, SystemClock};
use desksync_domain::{
    ApiFailure, DeskSyncError, Document, DocumentDeletion, DocumentSearchFilter, DocumentUpdate,
    Page, TenantAnalytics, TenantContext,
};

use crate::mutation::{self, MutationSpec, MutationState};
use crate::notify::Notifier;
use crate::query::prefetch::next_page_filter;
use crate::query::{QueryClient, QueryError, QueryKey, QueryPolicy, QueryResult};
use crate::transport::{decode, ApiTransport};

const RESOURCE: &str = "documents";
const SEARCH_PATH: &str = "/documents/search-documents";
const UPDATE_PATH: &str = "/documents/requests-update-data";
const DELETE_PATH: &str = "/documents/delete-doc-by-id";
const ANALYTICS_PATH: &str = "/documents/files/analytics/tenant";

/// Cached, tenant-gated access to the document endpoints.
pub struct DocumentService<C = SystemClock>
where
    C: Clock + Clone,
{
    client: QueryClient<C>,
    transport: Arc<dyn ApiTransport>,
    notifier: Arc<dyn Notifier>,
}

impl<C> DocumentService<C>
where
    C: Clock + Clone,
{
    pub fn new(
        client: QueryClient<C>,
        transport: Arc<dyn ApiTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { client, transport, notifier }
    }

    /// Paginated, filtered document search. Served from cache while fresh.
    pub async fn search(
        &self,
        tenant: &TenantContext,
        filter: &DocumentSearchFilter,
    ) -> Result<QueryResult<Page<Document>>, QueryError> {
        let key = QueryKey::build(RESOURCE, tenant, "search", &filter.to_filter_map());
        let params = filter.to_filter_map().to_query_params();
        let transport = Arc::clone(&self.transport);
        self.client
            .fetch(&key, &QueryPolicy::volatile(), || async move {
                let value = transport.get_json(tenant, SEARCH_PATH, &params).await?;
                decode(value)
            })
            .await
    }

    /// Warm the cache for the page after `current`. No-op on the last page.
    pub async fn prefetch_next_page(
        &self,
        tenant: &TenantContext,
        filter: &DocumentSearchFilter,
        current: &Page<Document>,
    ) {
        let Some(next) = next_page_filter(filter, current) else {
            return;
        };
        let key = QueryKey::build(RESOURCE, tenant, "search", &next.to_filter_map());
        let params = next.to_filter_map().to_query_params();
        let transport = Arc::clone(&self.transport);
        self.client
            .prefetch::<Page<Document>, _, _>(&key, &QueryPolicy::volatile(), || async move {
                let value = transport.get_json(tenant, SEARCH_PATH, &params).await?;
                decode(value)
            })
            .await;
    }

    /// Apply a partial update to a document. Invalidates every cached
    /// document query on success.
    ///
    /// `state` is owned by the caller so the host can read the pending
    /// flag while the request is in flight (e.g. to disable a save button).
    pub async fn update(
        &self,
        tenant: &TenantContext,
        update: &DocumentUpdate,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        if update.id.trim().is_empty() {
            return Err(DeskSyncError::InvalidInput("document id is required".into()));
        }
        if matches!(&update.title, Some(title) if title.trim().is_empty()) {
            return Err(DeskSyncError::InvalidInput("document title cannot be empty".into()));
        }

        let body = serde_json::to_value(update)
            .map_err(|err| DeskSyncError::Internal(err.to_string()))?;
        let spec = MutationSpec {
            invalidate: vec![QueryKey::parent(RESOURCE, tenant)],
            success_notice: "Document updated.".into(),
        };
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.post_json(tenant, UPDATE_PATH, &body).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    /// Delete one or many documents.
    ///
    /// The wire payload is a scalar id for a single deletion and an id
    /// array for a bulk one; the success notice reflects the count.
    pub async fn delete(
        &self,
        tenant: &TenantContext,
        deletion: &DocumentDeletion,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        if deletion.count() == 0 || deletion.ids().iter().any(|id| id.trim().is_empty()) {
            return Err(DeskSyncError::InvalidInput(
                "at least one document id is required".into(),
            ));
        }

        let notice = match deletion.count() {
            1 => "Document deleted.".to_string(),
            count => format!("{count} documents deleted."),
        };
        let body = deletion.to_payload();
        let spec = MutationSpec {
            invalidate: vec![QueryKey::parent(RESOURCE, tenant)],
            success_notice: notice,
        };
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.delete_json(tenant, DELETE_PATH, Some(&body)).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    /// Tenant-level usage analytics. Changes slowly, cached under the
    /// lookup policy.
    pub async fn analytics(
        &self,
        tenant: &TenantContext,
    ) -> Result<QueryResult<TenantAnalytics>, QueryError> {
        let key = QueryKey::operation(RESOURCE, tenant, "analytics");
        let transport = Arc::clone(&self.transport);
        self.client
            .fetch(&key, &QueryPolicy::lookup(), || async move {
                let value = transport.get_json(tenant, ANALYTICS_PATH, &[]).await?;
                decode(value)
            })
            .await
    }
}
