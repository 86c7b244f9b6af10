//! Shared runtime utilities for DeskSync crates.
//!
//! This crate holds the generic machinery the data-sync core is built on:
//! - `cache`: keyed store with staleness deadlines, prefix invalidation and
//!   per-key fetch generations
//! - `debounce`: clock-driven input debouncing state machine
//! - `time`: clock abstraction for deterministic time-based testing

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod debounce;
pub mod time;

// Re-export commonly used types and traits for convenience
pub use cache::{CacheConfig, CacheStats, CachedValue, KeyedCache, PrefixKey};
pub use debounce::{DebouncePhase, Debouncer};
pub use time::{Clock, MockClock, SystemClock};
