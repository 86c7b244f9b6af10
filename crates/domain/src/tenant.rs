//! Tenant scoping context
//!
//! Every query and mutation in DeskSync is scoped by the authenticated
//! tenant. The context is passed explicitly into each call rather than read
//! from ambient session state, which keeps the data-sync core testable and
//! makes cross-tenant cache bleed structurally impossible: the tenant id is
//! part of every cache key.

use serde::{Deserialize, Serialize};

/// The tenant an operation runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self { tenant_id: tenant_id.into() }
    }

    /// A context without a tenant, as seen before the session resolves.
    /// Queries built against it are disabled until a real tenant arrives.
    pub fn unresolved() -> Self {
        Self { tenant_id: String::new() }
    }

    /// Whether this context can actually reach the network. Callers must
    /// gate fetches on this; key construction itself never fails.
    pub fn is_scoped(&self) -> bool {
        !self.tenant_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_tenant_is_scoped() {
        assert!(TenantContext::new("acme").is_scoped());
    }

    #[test]
    fn unresolved_tenant_is_not_scoped() {
        assert!(!TenantContext::unresolved().is_scoped());
    }
}
