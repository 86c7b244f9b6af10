//! Document DTOs and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::filters::FilterMap;

/// Lifecycle state of a knowledge-base document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

/// A knowledge-base document as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub file_name: Option<String>,
    pub department_id: Option<String>,
    pub category_id: Option<String>,
    pub status: DocumentStatus,
    pub updated_at: DateTime<Utc>,
}

/// Filter set for the document search screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSearchFilter {
    pub page: u32,
    pub page_size: u32,
    pub query: String,
    pub department_id: Option<String>,
    pub category_id: Option<String>,
    pub include_inactive: bool,
}

impl Default for DocumentSearchFilter {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            query: String::new(),
            department_id: None,
            category_id: None,
            include_inactive: false,
        }
    }
}

impl DocumentSearchFilter {
    pub fn with_page(&self, page: u32) -> Self {
        Self { page, ..self.clone() }
    }

    /// Flatten into cache-key / query-string parameters. Absent optional
    /// filters are omitted entirely so `None` and "not set" key identically.
    pub fn to_filter_map(&self) -> FilterMap {
        let mut filters = FilterMap::new()
            .with("page", self.page)
            .with("page_size", self.page_size)
            .with("include_inactive", self.include_inactive);
        if !self.query.is_empty() {
            filters.set("query", self.query.as_str());
        }
        if let Some(department_id) = &self.department_id {
            filters.set("department_id", department_id.as_str());
        }
        if let Some(category_id) = &self.category_id {
            filters.set("category_id", category_id.as_str());
        }
        filters
    }
}

/// Partial update applied to a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
}

/// Deletion request for one or several documents.
///
/// The server contract differs by plurality: a single deletion sends a
/// scalar id, a bulk deletion sends an array. Success messaging reflects
/// the count as well, so the distinction is kept as a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentDeletion {
    Single(String),
    Many(Vec<String>),
}

impl DocumentDeletion {
    pub fn count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(ids) => ids.len(),
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Single(id) => vec![id.as_str()],
            Self::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }

    /// Wire payload: `{"id": "..."} ` for one document, `{"ids": [...]}`
    /// for several.
    pub fn to_payload(&self) -> Value {
        match self {
            Self::Single(id) => json!({ "id": id }),
            Self::Many(ids) => json!({ "ids": ids }),
        }
    }
}

/// Entry in the per-user file listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}
