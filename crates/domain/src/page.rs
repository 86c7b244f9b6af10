//! Paginated result sets
//!
//! The backend returns list data in pages; [`Page`] mirrors that envelope
//! shape and enforces its invariants when pages are constructed locally:
//! `current_page` stays within `[1, total_pages]` whenever `total_pages > 0`,
//! and `has_next`/`has_previous` are derived, never trusted blindly.

use serde::{Deserialize, Serialize};

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Build a page from raw parts, deriving the pagination flags.
    ///
    /// `page_size` must be non-zero; the requested page is clamped into the
    /// valid range so a stale page index (e.g. after deletes shrank the
    /// result set) still yields a well-formed page descriptor.
    pub fn new(items: Vec<T>, total_count: u64, requested_page: u32, page_size: u32) -> Self {
        let size = u64::from(page_size.max(1));
        let total_pages = total_count.div_ceil(size) as u32;
        let current_page = if total_pages == 0 {
            requested_page.max(1)
        } else {
            requested_page.clamp(1, total_pages)
        };

        Self {
            items,
            total_count,
            current_page,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: total_pages > 0 && current_page > 1,
        }
    }

    /// An empty result set.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 1, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The page index to prefetch next, if there is one.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.current_page + 1)
    }
}
