//! Cached query layer
//!
//! Everything on the read side lives here: the key registry that scopes
//! cache entries by `(resource, tenant, operation, filters)`, the policies
//! that set per-resource staleness windows, the client that orchestrates
//! cache-or-fetch, the observer-side handle that keeps previous data
//! visible during refetches, and the prefetch helper.

mod client;
mod handle;
mod key;
mod policy;
pub mod prefetch;

pub use client::{DataSource, QueryClient, QueryError, QueryResult};
pub use handle::{QueryHandle, QueryState};
pub use key::QueryKey;
pub use policy::QueryPolicy;
