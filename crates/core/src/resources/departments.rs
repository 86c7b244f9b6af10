//! Department listing, lookup projection and category linking

use std::sync::Arc;

use desksync_common::time::{Clock, SystemClock};
use desksync_domain::types::ListFilter;
use desksync_domain::{
    ApiFailure, Department, DepartmentLookup, DeskSyncError, Page, TenantContext,
};
use serde_json::json;

use crate::mutation::{self, MutationSpec, MutationState};
use crate::notify::Notifier;
use crate::query::{QueryClient, QueryError, QueryKey, QueryPolicy, QueryResult};
use crate::transport::{decode, ApiTransport};

const RESOURCE: &str = "departments";
const LIST_PATH: &str = "/departments/departments";
const LOOKUP_PATH: &str = "/departments/departments/lookup";

/// Department reads plus the category link/unlink mutations.
///
/// Linking changes what both the department views and the category views
/// display, so those mutations invalidate both resource prefixes.
pub struct DepartmentService<C = SystemClock>
where
    C: Clock + Clone,
{
    client: QueryClient<C>,
    transport: Arc<dyn ApiTransport>,
    notifier: Arc<dyn Notifier>,
}

impl<C> DepartmentService<C>
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

    /// Paginated department management list.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &ListFilter,
    ) -> Result<QueryResult<Page<Department>>, QueryError> {
        let key = QueryKey::build(RESOURCE, tenant, "list", &filter.to_filter_map());
        let params = filter.to_filter_map().to_query_params();
        let transport = Arc::clone(&self.transport);
        self.client
            .fetch(&key, &QueryPolicy::volatile(), || async move {
                let value = transport.get_json(tenant, LIST_PATH, &params).await?;
                decode(value)
            })
            .await
    }

    /// Slim id/name projection for dropdowns. Long staleness window.
    pub async fn lookup(
        &self,
        tenant: &TenantContext,
    ) -> Result<QueryResult<Vec<DepartmentLookup>>, QueryError> {
        let key = QueryKey::operation(RESOURCE, tenant, "lookup");
        let transport = Arc::clone(&self.transport);
        self.client
            .fetch(&key, &QueryPolicy::lookup(), || async move {
                let value = transport.get_json(tenant, LOOKUP_PATH, &[]).await?;
                decode(value)
            })
            .await
    }

    /// Attach a category to a department.
    pub async fn link_category(
        &self,
        tenant: &TenantContext,
        department_id: &str,
        category_id: &str,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        validate_link_ids(department_id, category_id)?;

        let path = format!("{LIST_PATH}/{department_id}/categories");
        let body = json!({ "category_id": category_id });
        let spec = MutationSpec {
            invalidate: vec![
                QueryKey::parent(RESOURCE, tenant),
                QueryKey::parent("categories", tenant),
            ],
            success_notice: "Category linked to department.".into(),
        };
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.post_json(tenant, &path, &body).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    /// Detach a category from a department.
    pub async fn unlink_category(
        &self,
        tenant: &TenantContext,
        department_id: &str,
        category_id: &str,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        validate_link_ids(department_id, category_id)?;

        let path = format!("{LIST_PATH}/{department_id}/categories/{category_id}");
        let spec = MutationSpec {
            invalidate: vec![
                QueryKey::parent(RESOURCE, tenant),
                QueryKey::parent("categories", tenant),
            ],
            success_notice: "Category unlinked from department.".into(),
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

fn validate_link_ids(department_id: &str, category_id: &str) -> Result<(), DeskSyncError> {
    if department_id.trim().is_empty() {
        return Err(DeskSyncError::InvalidInput("department id is required".into()));
    }
    if category_id.trim().is_empty() {
        return Err(DeskSyncError::InvalidInput("category id is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::resources::testing::MockTransport;

    #[tokio::test]
    async fn link_with_empty_category_id_is_rejected_locally() {
        let transport = Arc::new(MockTransport::new());
        let service = DepartmentService::new(
            QueryClient::new(),
            Arc::clone(&transport) as Arc<dyn ApiTransport>,
            Arc::new(RecordingNotifier::new()),
        );

        let result = service
            .link_category(&TenantContext::new("acme"), "dep-1", "", &MutationState::new())
            .await;

        assert!(matches!(result, Err(DeskSyncError::InvalidInput(_))));
        assert!(transport.requests().is_empty());
    }
}
