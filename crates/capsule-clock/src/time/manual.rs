use core::time::Duration;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Clock, Instant};

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// [`Ticker`] and keep another to advance it.
///
/// # Example
///
/// ```
/// use capsule_clock::{Clock, Instant, ManualClock};
///
/// let clock = ManualClock::new(Instant::parse("2024-01-01").unwrap());
/// let ticker_side = clock.clone();
///
/// clock.advance_millis(1500);
/// assert_eq!(ticker_side.now().to_string(), "2024-01-01T00:00:01.500");
/// ```
///
/// [`Ticker`]: crate::Ticker
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jumps to `instant`, forwards or backwards.
    pub fn set(&self, instant: Instant) {
        *self.now.lock() = instant;
    }

    /// Moves the clock forward, saturating at [`Instant::MAX`].
    pub fn advance(&self, by: Duration) {
        self.advance_millis(u64::try_from(by.as_millis()).unwrap_or(u64::MAX));
    }

    /// Moves the clock forward by `millis`, saturating at [`Instant::MAX`].
    pub fn advance_millis(&self, millis: u64) {
        let mut now = self.now.lock();
        *now = i64::try_from(millis)
            .ok()
            .and_then(|millis| now.checked_add_millis(millis))
            .unwrap_or(Instant::MAX);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let start = Instant::parse("2024-02-28T23:59:59").unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();

        clock.advance(Duration::from_secs(1));
        assert_eq!(other.now(), Instant::parse("2024-02-29").unwrap());

        other.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn advance_saturates() {
        let clock = ManualClock::new(Instant::MAX);
        clock.advance_millis(u64::MAX);
        assert_eq!(clock.now(), Instant::MAX);
    }

    #[test]
    fn works_through_references() {
        fn read(clock: impl Clock) -> Instant {
            clock.now()
        }

        let clock = ManualClock::new(Instant::parse("2024-01-01").unwrap());
        assert_eq!(read(&clock), clock.now());
        assert_eq!(read(Arc::new(clock.clone())), clock.now());
    }
}
