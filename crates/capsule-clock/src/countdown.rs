use core::fmt;

use crate::Instant;

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Time left until a target instant, as a flat split of the difference.
///
/// Unlike [`DurationBreakdown`] this is not calendar-aware: days are
/// unbounded and nothing borrows from months. A countdown counts down to an
/// instant, not across calendar fields.
///
/// [`DurationBreakdown`]: crate::DurationBreakdown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Remaining {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Remaining {
    /// Splits a millisecond count, dropping the sub-second remainder.
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            days: millis / MILLIS_PER_DAY,
            hours: ((millis / 3_600_000) % 24) as u32,
            minutes: ((millis / 60_000) % 60) as u32,
            seconds: ((millis / 1_000) % 60) as u32,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Whether a capsule with an open date may be opened yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CapsuleGate {
    /// The open date is still ahead.
    Locked(Remaining),
    /// The open date has been reached.
    Open,
}

impl CapsuleGate {
    /// The gate as seen at `now` for a capsule opening at `target`.
    ///
    /// The gate opens exactly at `target`. Less than a second before, it is
    /// still locked with an all-zero [`Remaining`].
    ///
    /// ```
    /// use capsule_clock::{CapsuleGate, Instant};
    ///
    /// let open_date = Instant::parse("2025-02-14T20:00:00").unwrap();
    /// let now = Instant::parse("2025-02-13T18:30:15").unwrap();
    ///
    /// match CapsuleGate::at(open_date, now) {
    ///     CapsuleGate::Locked(left) => assert_eq!(left.to_string(), "1d 1h 29m 45s"),
    ///     CapsuleGate::Open => unreachable!(),
    /// }
    /// assert!(CapsuleGate::at(open_date, open_date).is_open());
    /// ```
    pub fn at(target: Instant, now: Instant) -> Self {
        time_left(target, now).map_or(Self::Open, Self::Locked)
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for CapsuleGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked(remaining) => remaining.fmt(f),
            Self::Open => f.write_str("open"),
        }
    }
}

/// Time left from `now` until `target`, or `None` once `target` is reached.
pub fn time_left(target: Instant, now: Instant) -> Option<Remaining> {
    let diff = target.millis_since(now);
    (diff > 0).then(|| Remaining::from_millis(diff.unsigned_abs()))
}
