//! Query key registry
//!
//! A [`QueryKey`] is a pure, deterministic function of
//! `(resource, tenant, operation, filters)`. Filter pairs are folded in
//! sorted key order (the `FilterMap` is a BTreeMap), so two filter objects
//! with equal contents always produce the same key no matter how they were
//! built. The parent key `(resource, tenant)` is a segment prefix of every
//! more specific key, which is what prefix invalidation matches on.

use std::fmt;

use desksync_common::cache::PrefixKey;
use desksync_domain::{FilterMap, TenantContext};

/// Hierarchical cache key for a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    segments: Vec<String>,
    tenant_scoped: bool,
}

impl QueryKey {
    /// Parent key covering every operation and filter set of a resource
    /// for one tenant. Used as the invalidation prefix by mutations.
    pub fn parent(resource: &str, tenant: &TenantContext) -> Self {
        Self {
            segments: vec![resource.to_string(), tenant.tenant_id.clone()],
            tenant_scoped: tenant.is_scoped(),
        }
    }

    /// Full key for an operation with its filter set.
    ///
    /// An unscoped tenant still yields a key (so call sites can build and
    /// compare keys before the session resolves), but the key reports
    /// itself non-fetchable and the query client refuses to hit the
    /// network for it.
    pub fn build(
        resource: &str,
        tenant: &TenantContext,
        operation: &str,
        filters: &FilterMap,
    ) -> Self {
        let mut key = Self::parent(resource, tenant);
        key.segments.push(operation.to_string());
        for (name, value) in filters.iter() {
            key.segments.push(format!("{name}={value}"));
        }
        key
    }

    /// Key for an operation that takes no filters.
    pub fn operation(resource: &str, tenant: &TenantContext, operation: &str) -> Self {
        Self::build(resource, tenant, operation, &FilterMap::new())
    }

    /// Whether a network fetch may be performed under this key.
    pub fn is_fetchable(&self) -> bool {
        self.tenant_scoped
    }

    /// The ordered segments backing this key.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl PrefixKey for QueryKey {
    fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
