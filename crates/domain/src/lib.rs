//! # DeskSync Domain
//!
//! Data transfer objects and shared value types for DeskSync.
//!
//! This crate contains:
//! - Backend DTOs (documents, departments, categories, directory resources)
//! - Pagination types and their invariants
//! - Filter maps with value-identity equality
//! - Tenant scoping context
//! - Error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other DeskSync crates
//! - Only external dependencies allowed
//! - Pure data structures; no I/O

pub mod errors;
pub mod filters;
pub mod page;
pub mod tenant;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use filters::{FilterMap, FilterValue};
pub use page::Page;
pub use tenant::TenantContext;
pub use types::*;
