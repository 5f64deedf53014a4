//! Request-scoped busy tracking.
//!
//! Every network round trip holds a [`BusyGuard`]; the indicator is busy while
//! at least one guard is alive, so overlapping operations cannot clear it for
//! each other.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::watch;

#[derive(Debug)]
struct Inner {
    pending: Mutex<usize>,
    busy_tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct BusyTracker {
    inner: Arc<Inner>,
}

impl Default for BusyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyTracker {
    pub fn new() -> Self {
        let (busy_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(0),
                busy_tx,
            }),
        }
    }

    /// Mark one operation as started. The returned guard settles it on drop.
    pub fn begin(&self) -> BusyGuard {
        self.inner.adjust(|pending| *pending += 1);
        BusyGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Run `fut` while holding a guard.
    pub async fn track<F: Future>(&self, fut: F) -> F::Output {
        let _guard = self.begin();
        fut.await
    }

    pub fn pending(&self) -> usize {
        *self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    /// Observe busy/idle transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.busy_tx.subscribe()
    }
}

impl Inner {
    fn adjust(&self, f: impl FnOnce(&mut usize)) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut pending);
        // Published under the lock so transitions cannot be observed out of order.
        let busy = *pending > 0;
        self.busy_tx.send_if_modified(|current| {
            let changed = *current != busy;
            *current = busy;
            changed
        });
    }
}

#[must_use = "the operation is settled as soon as the guard is dropped"]
#[derive(Debug)]
pub struct BusyGuard {
    inner: Arc<Inner>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner
            .adjust(|pending| *pending = pending.saturating_sub(1));
    }
}
