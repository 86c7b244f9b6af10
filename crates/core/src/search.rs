//! Debounced search over a filter set
//!
//! [`SearchController`] couples the debounce machine to a
//! [`DocumentSearchFilter`]: raw keystrokes go in, and only a committed
//! pause (or an explicit clear) produces a [`SearchCommit`] carrying the
//! filter the next query should run with. Every commit resets the page to
//! 1, since a changed query invalidates the old page position.

use std::time::Duration;

use desksync_common::debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
use desksync_common::time::{Clock, SystemClock};
use desksync_domain::DocumentSearchFilter;

/// A committed search: the query text plus the full filter to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommit {
    pub query: String,
    pub filter: DocumentSearchFilter,
}

/// Owns the search input state for one list view.
#[derive(Debug)]
pub struct SearchController<C: Clock = SystemClock> {
    debounce: Debouncer<C>,
    filter: DocumentSearchFilter,
}

impl SearchController<SystemClock> {
    pub fn new(filter: DocumentSearchFilter) -> Self {
        Self::with_clock(filter, DEFAULT_DEBOUNCE_WINDOW, SystemClock)
    }
}

impl<C: Clock> SearchController<C> {
    pub fn with_clock(filter: DocumentSearchFilter, window: Duration, clock: C) -> Self {
        Self { debounce: Debouncer::with_clock(window, clock), filter }
    }

    /// Record a keystroke; nothing commits until the pause window elapses.
    pub fn input(&mut self, text: impl Into<String>) {
        self.debounce.input(text);
    }

    /// Commit the pending query if its pause window has elapsed.
    pub fn poll(&mut self) -> Option<SearchCommit> {
        let query = self.debounce.poll()?.to_string();
        Some(self.commit(query))
    }

    /// Clear the search box: commits the empty query immediately.
    pub fn clear(&mut self) -> SearchCommit {
        let query = self.debounce.clear().to_string();
        self.commit(query)
    }

    /// Page navigation does not touch the query or the debounce state.
    pub fn set_page(&mut self, page: u32) {
        self.filter.page = page;
    }

    /// The filter the view is currently rendering with.
    pub fn filter(&self) -> &DocumentSearchFilter {
        &self.filter
    }

    /// Whether a keystroke is waiting out its pause window.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    fn commit(&mut self, query: String) -> SearchCommit {
        self.filter.query = query.clone();
        self.filter.page = 1;
        SearchCommit { query, filter: self.filter.clone() }
    }
}
