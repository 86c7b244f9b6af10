//! Next-page prefetch helpers
//!
//! Pagination controls warm the cache for page+1 on hover or focus, never
//! on a timer. The helpers here only derive the next filter set; the
//! actual warm-up goes through [`crate::query::QueryClient::prefetch`]
//! with exactly the same key construction as the read path.

use desksync_domain::types::ListFilter;
use desksync_domain::{DocumentSearchFilter, Page};

/// Filter sets that carry a page index.
pub trait PagedFilter: Sized {
    fn page(&self) -> u32;
    fn with_page(&self, page: u32) -> Self;
}

impl PagedFilter for DocumentSearchFilter {
    fn page(&self) -> u32 {
        self.page
    }

    fn with_page(&self, page: u32) -> Self {
        DocumentSearchFilter::with_page(self, page)
    }
}

impl PagedFilter for ListFilter {
    fn page(&self) -> u32 {
        self.page
    }

    fn with_page(&self, page: u32) -> Self {
        ListFilter::with_page(self, page)
    }
}

/// The filter set for the page after `current`, if there is one.
pub fn next_page_filter<F: PagedFilter, T>(filter: &F, current: &Page<T>) -> Option<F> {
    current.next_page().map(|page| filter.with_page(page))
}
