use core::time::Duration;

/// Represents the result of polling a [`Ticker`].
///
/// - [`TickStatus::Fired`] means a reading was delivered to the callback.
/// - [`TickStatus::Pending`] means the next tick is not due yet; wait for
///   `yield_for` before polling again.
/// - [`TickStatus::Stopped`] means the ticker's handle has been stopped and
///   it will never fire again.
///
/// [`Ticker`]: crate::Ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// The callback ran with a fresh reading.
    Fired,
    /// The next tick is not due yet.
    Pending {
        /// How long until the next tick is due.
        yield_for: Duration,
    },
    /// The ticker has been stopped.
    Stopped,
}

impl TickStatus {
    pub const fn is_fired(&self) -> bool {
        matches!(self, Self::Fired)
    }

    pub const fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns the wait of a [`TickStatus::Pending`].
    ///
    /// # Panics
    ///
    /// Panics on any other variant.
    #[cfg(test)]
    pub(crate) fn unwrap_pending(self) -> Duration {
        match self {
            Self::Pending { yield_for } => yield_for,
            other => panic!("expected Pending, got {other:?}"),
        }
    }
}
