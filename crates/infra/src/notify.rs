//! Tracing-backed notice sink

use desksync_core::notify::{Notice, NoticeKind, Notifier};
use tracing::{error, info};

/// Emits notices as structured log events. Hosts that render toasts plug
/// in their own [`Notifier`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => info!(message = %notice.message, "notice"),
            NoticeKind::Error => error!(message = %notice.message, "notice"),
        }
    }
}
