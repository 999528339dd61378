//! Push subscription plumbing.
//!
//! Snapshots arrive over a channel instead of a callback pair; dropping the
//! subscription unsubscribes. `recv() -> None` signals that the backend has
//! shut the listener down.

use crate::StoreError;
use serde_json::Value;
use tokio::sync::mpsc;

/// One delivery from a store subscription: the snapshot at the subscribed
/// path (`None` when absent), or a backend error.
pub type StoreEvent = Result<Option<Value>, StoreError>;

/// RAII teardown for a push listener. Runs its teardown exactly once, when
/// dropped.
pub struct SubscriptionGuard(Option<Box<dyn FnOnce() + Send>>);

impl SubscriptionGuard {
    /// Wraps a backend-specific teardown.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(teardown)))
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

/// A live push subscription at a store path.
pub struct StoreSubscription {
    rx: mpsc::UnboundedReceiver<StoreEvent>,
    _guard: SubscriptionGuard,
}

impl StoreSubscription {
    /// Assembles a subscription from its delivery channel and teardown guard.
    pub fn new(rx: mpsc::UnboundedReceiver<StoreEvent>, guard: SubscriptionGuard) -> Self {
        Self { rx, _guard: guard }
    }

    /// Receives the next delivery. `None` means the listener is gone.
    pub async fn recv(&mut self) -> Option<StoreEvent> {
        self.rx.recv().await
    }
}
