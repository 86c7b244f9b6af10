//! Backend DTOs grouped by resource family
//!
//! These types mirror the backend's JSON shapes. They are decoded at the
//! network boundary with serde so shape drift fails loudly instead of
//! propagating `null`s through the cache.

pub mod analytics;
pub mod content;
pub mod documents;
pub mod org;
pub mod people;

pub use analytics::{DepartmentUsage, TenantAnalytics};
pub use content::{ContactField, Lifecycle, Snippet, Tag};
pub use documents::{
    Document, DocumentDeletion, DocumentSearchFilter, DocumentStatus, DocumentUpdate, FileRecord,
};
pub use org::{Category, CategoryDraft, CategoryUpdate, Department, DepartmentLookup};
pub use people::{Team, User};

use serde::{Deserialize, Serialize};

use crate::filters::FilterMap;

/// Common list filter used by the directory resources (users, tags, teams,
/// snippets, lifecycles, contact fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub page: u32,
    pub page_size: u32,
    pub query: String,
    pub include_inactive: bool,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self { page: 1, page_size: 25, query: String::new(), include_inactive: false }
    }
}

impl ListFilter {
    pub fn with_page(&self, page: u32) -> Self {
        Self { page, ..self.clone() }
    }

    pub fn to_filter_map(&self) -> FilterMap {
        let mut filters = FilterMap::new()
            .with("page", self.page)
            .with("page_size", self.page_size)
            .with("include_inactive", self.include_inactive);
        if !self.query.is_empty() {
            filters.set("query", self.query.as_str());
        }
        filters
    }
}
