//! Read-side observer state
//!
//! A [`QueryHandle`] is what a list view holds: the last data it may
//! render, the loading flags that drive skeletons and dimming, and the key
//! it currently observes. Responses for keys the handle has moved away
//! from are discarded on arrival, so a superseded request can never
//! clobber the state of a newer one.

use desksync_domain::ApiFailure;

use super::key::QueryKey;
use super::policy::QueryPolicy;

/// Render-ready snapshot of a query's state.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    /// First load for the observed key: nothing to render yet.
    pub is_loading: bool,
    /// A request is in flight (first load or background refresh).
    pub is_fetching: bool,
}

impl<T> QueryState<T> {
    /// Background refresh: data is on screen, a newer version is coming.
    /// Views dim rather than blank on this.
    pub fn is_background_refresh(&self) -> bool {
        self.is_fetching && !self.is_loading
    }
}

/// Observer-side state machine for one query slot.
#[derive(Debug)]
pub struct QueryHandle<T> {
    keep_previous_data: bool,
    current_key: Option<QueryKey>,
    data: Option<T>,
    error: Option<String>,
    is_loading: bool,
    is_fetching: bool,
}

impl<T: Clone> QueryHandle<T> {
    pub fn new(policy: &QueryPolicy) -> Self {
        Self {
            keep_previous_data: policy.keep_previous_data,
            current_key: None,
            data: None,
            error: None,
            is_loading: false,
            is_fetching: false,
        }
    }

    /// Start observing `key`; call right before the fetch is issued.
    ///
    /// With `keep_previous_data`, moving to a new key (the next page, a new
    /// filter set) keeps the old rows visible and reports a background
    /// refresh instead of a first load.
    pub fn begin(&mut self, key: QueryKey) {
        let same_key = self.current_key.as_ref() == Some(&key);
        if !same_key && !self.keep_previous_data {
            self.data = None;
        }
        self.error = None;
        self.is_loading = self.data.is_none();
        self.is_fetching = true;
        self.current_key = Some(key);
    }

    /// Apply a response for `key`.
    ///
    /// Returns `false` (and changes nothing) when the handle has since
    /// moved to a different key: the response belongs to a stale
    /// subscriber and is discarded.
    pub fn resolve(&mut self, key: &QueryKey, result: Result<T, ApiFailure>) -> bool {
        if self.current_key.as_ref() != Some(key) {
            return false;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(failure) => {
                // Previous data stays visible under an error banner.
                self.error = Some(failure.to_string());
            }
        }
        self.is_loading = false;
        self.is_fetching = false;
        true
    }

    /// Snapshot for rendering.
    pub fn state(&self) -> QueryState<T> {
        QueryState {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }
}
