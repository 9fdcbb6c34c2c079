//! A cloneable handle for observing and interrupting a dialogue from
//! external code.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;

/// Cloneable handle onto a running dialogue.
///
/// The pending flag is the mutual-exclusion mechanism for `send`: a
/// second send while one is in flight is rejected, never queued. All
/// fields are `Arc`-wrapped, so cloning is cheap.
#[derive(Clone)]
pub struct DialogueHandle {
    cancel: Arc<Mutex<CancellationToken>>,
    pending: Arc<AtomicBool>,
    idle_notify: Arc<tokio::sync::Notify>,
}

impl DialogueHandle {
    pub(crate) fn new() -> Self {
        Self {
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            pending: Arc::new(AtomicBool::new(false)),
            idle_notify: Arc::new(tokio::sync::Notify::new()),
        }
    }

    /// Claim the pending flag. Returns `false` if a send is already in
    /// flight, in which case the caller must reject with `Busy`.
    pub(crate) fn try_begin(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clear the pending flag and wake idle waiters.
    pub(crate) fn finish(&self) {
        self.pending.store(false, Ordering::Release);
        self.idle_notify.notify_waiters();
    }

    /// Whether a send is currently being processed.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Cancel the in-flight interpretation, if any. The affected send
    /// falls back to the Unclear branch rather than failing.
    pub fn abort(&self) {
        self.cancel.lock().cancel();
    }

    /// Replace the cancellation token for a fresh send and return a
    /// child for the interpreter call.
    pub(crate) fn fresh_cancel_token(&self) -> CancellationToken {
        let mut guard = self.cancel.lock();
        *guard = CancellationToken::new();
        guard.clone()
    }

    /// Wait until the in-flight send (if any) resolves.
    pub async fn wait_for_idle(&self) {
        let notified = self.idle_notify.notified();
        if !self.is_pending() {
            return;
        }
        notified.await;
    }
}
