//! Typed resource services over the transport port
//!
//! Every read is tenant-gated and cached under a registry key; every write
//! goes through the mutation runner and its invalidation contract.

mod categories;
mod departments;
mod directory;
mod documents;

pub use categories::CategoryService;
pub use departments::DepartmentService;
pub use directory::{
    ContactFieldDirectory, DirectoryService, DirectorySpec, LifecycleDirectory, SnippetDirectory,
    TagDirectory, TeamDirectory, UserDirectory,
};
pub use documents::DocumentService;
