//! Handle to a sprint's recurring tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

/// Owned registration of a sprint's tick timer.
///
/// Clones share the same underlying token: the sprint keeps one to retire on
/// its terminal transition, the actor loop keeps one to stop ticking, and the
/// registry keeps one for shutdown. Retiring more than once is a no-op.
#[derive(Debug, Clone, Default)]
pub struct TickHandle {
    token: CancellationToken,
    retired: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the timer. Returns `true` only for the call that actually retired it.
    pub fn retire(&self) -> bool {
        if self.retired.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_retired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the timer is retired.
    pub async fn retired(&self) {
        self.token.cancelled().await;
    }
}
