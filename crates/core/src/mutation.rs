//! Mutation runner and its cache-invalidation contract
//!
//! Every write in the system flows through [`run`]:
//! - success invalidates the listed key prefixes, then emits a success
//!   notice;
//! - an application failure (the server answered `success: false`) emits
//!   the server's message, or the generic fallback when it sent none, and
//!   invalidates nothing;
//! - a transport failure emits the generic fallback and invalidates
//!   nothing.
//!
//! The invalidation-on-success ordering matters: by the time the user sees
//! the notice, every affected list query is already marked stale, so the
//! next render refetches instead of showing the pre-mutation rows.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use desksync_common::time::Clock;
use desksync_domain::ApiFailure;
use tracing::warn;

use crate::notify::{Notice, Notifier};
use crate::query::{QueryClient, QueryKey};

/// Fallback shown when a failure carries no usable server message.
pub const GENERIC_FAILURE_NOTICE: &str = "Something went wrong. Please try again.";

/// Per-invocation pending flag.
///
/// Each mutation call owns its own state, so two rows being saved at the
/// same time report their pending status independently.
#[derive(Debug, Clone, Default)]
pub struct MutationState {
    pending: Arc<AtomicBool>,
}

impl MutationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    fn enter(&self) -> PendingGuard {
        self.pending.store(true, Ordering::SeqCst);
        PendingGuard(Arc::clone(&self.pending))
    }
}

struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// What to do after a mutation succeeds.
#[derive(Debug, Clone)]
pub struct MutationSpec {
    /// Key prefixes whose cached queries become stale on success.
    pub invalidate: Vec<QueryKey>,
    /// Success notice text.
    pub success_notice: String,
}

/// Execute a mutation and reconcile cache and notices.
///
/// The returned result still carries the failure for callers that branch
/// on it; user messaging has already happened by then.
pub async fn run<T, F, Fut, C>(
    client: &QueryClient<C>,
    notifier: &dyn Notifier,
    state: &MutationState,
    spec: MutationSpec,
    op: F,
) -> Result<T, ApiFailure>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiFailure>>,
    C: Clock + Clone,
{
    let _pending = state.enter();

    match op().await {
        Ok(data) => {
            for prefix in &spec.invalidate {
                client.invalidate(prefix);
            }
            notifier.notify(Notice::success(spec.success_notice));
            Ok(data)
        }
        Err(failure) => {
            warn!(%failure, "mutation failed; cache left untouched");
            notifier.notify(Notice::error(failure.user_message(GENERIC_FAILURE_NOTICE)));
            Err(failure)
        }
    }
}
