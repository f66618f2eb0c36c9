use std::sync::Arc;

use crate::Instant;

/// A source of "now".
///
/// This abstraction allows you to plug in the real wall clock, or a
/// controllable fake such as [`ManualClock`] in tests.
///
/// # Example
///
/// ```
/// use capsule_clock::{Clock, Instant};
///
/// struct FixedTime;
/// impl Clock for FixedTime {
///     fn now(&self) -> Instant {
///         Instant::from_millis(1234).unwrap()
///     }
/// }
///
/// assert_eq!(FixedTime.now().as_millis(), 1234);
/// ```
///
/// [`ManualClock`]: crate::ManualClock
pub trait Clock {
    /// Returns the current wall-clock instant.
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
