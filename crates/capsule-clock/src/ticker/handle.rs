use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use portable_atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct HandleInner {
    /// Held across every callback and by `stop`. Re-entrant so a callback
    /// can stop its own ticker.
    gate: ReentrantMutex<()>,
    stopped: AtomicBool,
}

/// Shared stop switch for a [`Ticker`].
///
/// Clones refer to the same ticker. Stopping is synchronous: once
/// [`stop`](Self::stop) returns, the ticker's callback will not run again.
/// If a callback is running on another thread at that moment, `stop` waits
/// for it to finish. Calling `stop` from inside the callback itself returns
/// immediately.
///
/// [`Ticker`]: crate::Ticker
#[derive(Clone, Debug, Default)]
pub struct TickerHandle {
    inner: Arc<HandleInner>,
}

impl TickerHandle {
    /// A fresh, running handle. Pass it to [`Ticker::start_with`] when the
    /// callback needs to stop its own ticker.
    ///
    /// [`Ticker::start_with`]: crate::Ticker::start_with
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the ticker. Idempotent.
    pub fn stop(&self) {
        let _gate = self.inner.gate.lock();
        if !self.inner.stopped.swap(true, Ordering::AcqRel) {
            #[cfg(feature = "tracing")]
            tracing::debug!("ticker stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Returns `true` if both handles control the same ticker.
    pub fn same_ticker(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Enters the callback gate. `None` when already stopped; the guard must
    /// be held for the whole callback.
    pub(crate) fn enter(&self) -> Option<ReentrantMutexGuard<'_, ()>> {
        let gate = self.inner.gate.lock();
        (!self.is_stopped()).then_some(gate)
    }
}
