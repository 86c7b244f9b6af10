//! Generic list/create/update/delete service for the simple directories
//!
//! Users, tags, teams, snippets, lifecycles and dynamic contact fields all
//! follow the same shape: a paginated list endpoint plus id-addressed
//! writes. One generic service covers them; each directory differs only in
//! its base path, cache-key resource segment, notice wording, and
//! staleness class.

use std::marker::PhantomData;
use std::sync::Arc;

use desksync_common::time::{Clock, SystemClock};
use desksync_domain::types::ListFilter;
use desksync_domain::{
    ApiFailure, ContactField, DeskSyncError, Lifecycle, Page, Snippet, Tag, Team, TenantContext,
    User,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::mutation::{self, MutationSpec, MutationState};
use crate::notify::Notifier;
use crate::query::prefetch::next_page_filter;
use crate::query::{QueryClient, QueryError, QueryKey, QueryPolicy, QueryResult};
use crate::transport::{decode, ApiTransport};

/// Static description of one directory resource.
#[derive(Debug, Clone, Copy)]
pub struct DirectorySpec {
    /// Cache-key resource segment, e.g. `"users"`.
    pub resource: &'static str,
    /// REST base path, e.g. `"/users"`.
    pub base_path: &'static str,
    /// Capitalized singular used in notices, e.g. `"User"`.
    pub display: &'static str,
    /// Whether the list changes often enough to warrant the short window.
    pub volatile: bool,
}

impl DirectorySpec {
    pub const USERS: Self =
        Self { resource: "users", base_path: "/users", display: "User", volatile: true };
    pub const TAGS: Self =
        Self { resource: "tags", base_path: "/tags", display: "Tag", volatile: false };
    pub const TEAMS: Self =
        Self { resource: "teams", base_path: "/teams", display: "Team", volatile: true };
    pub const SNIPPETS: Self =
        Self { resource: "snippets", base_path: "/snippets", display: "Snippet", volatile: false };
    pub const LIFECYCLES: Self = Self {
        resource: "lifecycles",
        base_path: "/lifecycles",
        display: "Lifecycle",
        volatile: false,
    };
    pub const CONTACT_FIELDS: Self = Self {
        resource: "contact-fields",
        base_path: "/contact-fields",
        display: "Contact field",
        volatile: false,
    };

    fn policy(&self) -> QueryPolicy {
        if self.volatile {
            QueryPolicy::volatile()
        } else {
            QueryPolicy::lookup()
        }
    }
}

/// Generic directory service, instantiated per DTO type.
pub struct DirectoryService<T, C = SystemClock>
where
    C: Clock + Clone,
{
    spec: DirectorySpec,
    client: QueryClient<C>,
    transport: Arc<dyn ApiTransport>,
    notifier: Arc<dyn Notifier>,
    _marker: PhantomData<fn() -> T>,
}

pub type UserDirectory<C = SystemClock> = DirectoryService<User, C>;
pub type TagDirectory<C = SystemClock> = DirectoryService<Tag, C>;
pub type TeamDirectory<C = SystemClock> = DirectoryService<Team, C>;
pub type SnippetDirectory<C = SystemClock> = DirectoryService<Snippet, C>;
pub type LifecycleDirectory<C = SystemClock> = DirectoryService<Lifecycle, C>;
pub type ContactFieldDirectory<C = SystemClock> = DirectoryService<ContactField, C>;

impl<T, C> DirectoryService<T, C>
where
    T: DeserializeOwned + Serialize,
    C: Clock + Clone,
{
    pub fn new(
        spec: DirectorySpec,
        client: QueryClient<C>,
        transport: Arc<dyn ApiTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { spec, client, transport, notifier, _marker: PhantomData }
    }

    pub fn spec(&self) -> &DirectorySpec {
        &self.spec
    }

    /// Paginated listing under the directory's staleness class.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &ListFilter,
    ) -> Result<QueryResult<Page<T>>, QueryError> {
        let key = QueryKey::build(self.spec.resource, tenant, "list", &filter.to_filter_map());
        let params = filter.to_filter_map().to_query_params();
        let transport = Arc::clone(&self.transport);
        let path = self.spec.base_path;
        self.client
            .fetch(&key, &self.spec.policy(), || async move {
                let value = transport.get_json(tenant, path, &params).await?;
                decode(value)
            })
            .await
    }

    /// Warm the cache for the page after `current`.
    pub async fn prefetch_next_page(
        &self,
        tenant: &TenantContext,
        filter: &ListFilter,
        current: &Page<T>,
    ) {
        let Some(next) = next_page_filter(filter, current) else {
            return;
        };
        let key = QueryKey::build(self.spec.resource, tenant, "list", &next.to_filter_map());
        let params = next.to_filter_map().to_query_params();
        let transport = Arc::clone(&self.transport);
        let path = self.spec.base_path;
        self.client
            .prefetch::<Page<T>, _, _>(&key, &self.spec.policy(), || async move {
                let value = transport.get_json(tenant, path, &params).await?;
                decode(value)
            })
            .await;
    }

    pub async fn create(
        &self,
        tenant: &TenantContext,
        payload: &impl Serialize,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        let body = serde_json::to_value(payload)
            .map_err(|err| DeskSyncError::Internal(err.to_string()))?;
        let path = self.spec.base_path.to_string();
        let spec = self.mutation_spec(tenant, "created");
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.post_json(tenant, &path, &body).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    pub async fn update(
        &self,
        tenant: &TenantContext,
        id: &str,
        payload: &impl Serialize,
        state: &MutationState,
    ) -> Result<(), DeskSyncError> {
        self.require_id(id)?;
        let body = serde_json::to_value(payload)
            .map_err(|err| DeskSyncError::Internal(err.to_string()))?;
        let path = format!("{}/{id}", self.spec.base_path);
        let spec = self.mutation_spec(tenant, "updated");
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
        self.require_id(id)?;
        let path = format!("{}/{id}", self.spec.base_path);
        let spec = self.mutation_spec(tenant, "deleted");
        let transport = Arc::clone(&self.transport);
        mutation::run(&self.client, self.notifier.as_ref(), state, spec, || async move {
            transport.delete_json(tenant, &path, None).await?;
            Ok::<_, ApiFailure>(())
        })
        .await?;
        Ok(())
    }

    fn require_id(&self, id: &str) -> Result<(), DeskSyncError> {
        if id.trim().is_empty() {
            return Err(DeskSyncError::InvalidInput(format!(
                "{} id is required",
                self.spec.display.to_lowercase()
            )));
        }
        Ok(())
    }

    fn mutation_spec(&self, tenant: &TenantContext, verb: &str) -> MutationSpec {
        MutationSpec {
            invalidate: vec![QueryKey::parent(self.spec.resource, tenant)],
            success_notice: format!("{} {verb}.", self.spec.display),
        }
    }
}
