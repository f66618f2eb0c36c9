use chrono::Local;

use crate::{Clock, Instant};

/// The local wall clock.
///
/// Reads `chrono::Local::now()` on every call and drops the offset, so the
/// result lines up with instants parsed by [`Instant::parse`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::from_naive(Local::now().naive_local())
    }
}
