//! # DeskSync Core
//!
//! The client-side data-synchronization layer: query keys, cached reads,
//! invalidating mutations, debounced search, and prefetching.
//!
//! This crate contains:
//! - The query key registry and cached query client
//! - Resource services (documents, departments, categories, directory)
//! - The mutation runner with its cache-invalidation contract
//! - Search and file-browser controllers
//! - Port interfaces (transport, notifications) implemented in `infra`
//!
//! ## Architecture Principles
//! - Only depends on `desksync-common` and `desksync-domain`
//! - No HTTP or platform code; all I/O goes through the transport port
//! - Tenant context is an explicit parameter on every call

pub mod files;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod resources;
pub mod search;
pub mod transport;

// Re-export specific items to avoid ambiguity
pub use files::{FileBrowser, FileSlot};
pub use mutation::{MutationState, GENERIC_FAILURE_NOTICE};
pub use notify::{Notice, NoticeKind, Notifier, RecordingNotifier};
pub use query::{QueryClient, QueryError, QueryHandle, QueryKey, QueryPolicy, QueryState};
pub use resources::{
    CategoryService, ContactFieldDirectory, DepartmentService, DocumentService,
    LifecycleDirectory, SnippetDirectory, TagDirectory, TeamDirectory, UserDirectory,
};
pub use search::{SearchCommit, SearchController};
pub use transport::ApiTransport;
