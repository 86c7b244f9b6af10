//! Tag, snippet, lifecycle and dynamic contact field DTOs

use serde::{Deserialize, Serialize};

/// A label attached to documents or conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A canned response snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// A configurable lifecycle with ordered stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub id: String,
    pub name: String,
    pub stages: Vec<String>,
    pub is_default: bool,
}

/// A dynamic contact field defined per tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactField {
    pub id: String,
    pub label: String,
    pub field_type: String,
    pub required: bool,
}
