//! Tenant-level usage analytics DTOs

use serde::{Deserialize, Serialize};

/// Aggregate document/storage numbers for a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantAnalytics {
    pub total_documents: u64,
    pub total_storage_bytes: u64,
    pub documents_this_month: u64,
    #[serde(default)]
    pub top_departments: Vec<DepartmentUsage>,
}

/// Per-department contribution to tenant usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentUsage {
    pub department_id: String,
    pub department_name: String,
    pub document_count: u64,
}
