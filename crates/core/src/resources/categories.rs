//! Category CRUD

use std::sync::Arc;

use desksync_common::time::{Clock, SystemClock};
use desksync_domain::types::ListFilter;
use desksync_domain::{
    ApiFailure, Category, CategoryDraft, CategoryUpdate, DeskSyncError, Page, TenantContext,
};

use crate::mutation::{self, MutationSpec, MutationState};
use crate::notify::Notifier;
use crate::query::{QueryClient, QueryError, QueryKey, QueryPolicy, QueryResult};
use crate::transport::{decode, ApiTransport};

const RESOURCE: &str = "categories";
const BASE_PATH: &str = "/categories";

pub struct CategoryService<C = SystemClock>
where
    C: Clock + Clone,
{
    client: QueryClient<C>,
    transport: Arc<dyn ApiTransport>,
    notifier: Arc<dyn Notifier>,
}

impl<C> CategoryService<C>
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

    /// Category list; feeds both the management table and the pickers.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &ListFilter,
    ) -> Result<QueryResult<Page<Category>>, QueryError> {
        let key = QueryKey::build(RESOURCE, tenant, "list", &filter.to_filter_map());
        let params = filter.to_filter_map().to_query_params();
        let transport = Arc::clone(&self.transport);
        self.client
            .fetch(&key, &QueryPolicy::lookup(), || async move {
                let value = transport.get_json(tenant, BASE_PATH, &params).await?;
                decode(value)
            })
            .await
    }

    pub async fn create(
        &self,
        tenant: &TenantContext,
        draft: &CategoryDraft,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        if draft.name.trim().is_empty() {
            return Err(DeskSyncError::InvalidInput("category name is required".into()));
        }

        let body = serde_json::to_value(draft)
            .map_err(|err| DeskSyncError::Internal(err.to_string()))?;
        let spec = MutationSpec {
            invalidate: vec![QueryKey::parent(RESOURCE, tenant)],
            success_notice: "Category created.".into(),
        };
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.post_json(tenant, BASE_PATH, &body).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    pub async fn update(
        &self,
        tenant: &TenantContext,
        id: &str,
        update: &CategoryUpdate,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        if id.trim().is_empty() {
            return Err(DeskSyncError::InvalidInput("category id is required".into()));
        }
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return Err(DeskSyncError::InvalidInput("category name cannot be empty".into()));
        }

        let path = format!("{BASE_PATH}/{id}");
        let body = serde_json::to_value(update)
            .map_err(|err| DeskSyncError::Internal(err.to_string()))?;
        let spec = MutationSpec {
            invalidate: vec![QueryKey::parent(RESOURCE, tenant)],
            success_notice: "Category updated.".into(),
        };
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.patch_json(tenant, &path, &body).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    pub async fn delete(
        &self,
        tenant: &TenantContext,
        id: &str,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        if id.trim().is_empty() {
            return Err(DeskSyncError::InvalidInput("category id is required".into()));
        }

        let path = format!("{BASE_PATH}/{id}");
        let spec = MutationSpec {
            invalidate: vec![QueryKey::parent(RESOURCE, tenant)],
            success_notice: "Category deleted.".into(),
        };
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.delete_json(tenant, &path, None).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }
}
