use core::fmt;

use chrono::Datelike;

use super::calendar::{days_in_month, previous_month};
use crate::Instant;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const HOURS_PER_DAY: u64 = 24;
const DAYS_PER_WEEK: u32 = 7;

/// Which optional fields a [`DurationBreakdown`] reports.
///
/// The default reports days within the month and no milliseconds, which is
/// what a once-per-second "time together" display wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationOptions {
    /// Split the day count into whole weeks plus a day-of-week remainder.
    pub weeks: bool,
    /// Report the sub-second remainder.
    pub milliseconds: bool,
}

impl DurationOptions {
    /// Reports [`DaySpan::Weeks`] instead of [`DaySpan::Days`].
    pub const fn with_weeks(mut self) -> Self {
        self.weeks = true;
        self
    }

    /// Reports [`DurationBreakdown::milliseconds`].
    pub const fn with_milliseconds(mut self) -> Self {
        self.milliseconds = true;
        self
    }
}

/// The day component of a breakdown.
///
/// The two variants carry different meanings and are kept apart on purpose:
/// `Days::days` counts days past the last whole month, while
/// `Weeks::days_of_week` is only the remainder after taking whole weeks out
/// of that same count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DaySpan {
    /// Days past the last whole month, `0..=30`.
    ///
    /// A start day past the end of the borrowed month counts from that
    /// month's last day, so the count can exceed the borrowed month's
    /// length minus one (Jan 31 to Mar 29, 2024 is 1 month 29 days).
    Days {
        /// Days within the month.
        days: u32,
    },
    /// The same count expressed as whole weeks and leftover days.
    Weeks {
        /// Whole weeks within the month.
        weeks: u32,
        /// Leftover days, `0..=6`.
        days_of_week: u32,
    },
}

impl DaySpan {
    fn new(days: u32, weeks: bool) -> Self {
        if weeks {
            Self::Weeks {
                weeks: days / DAYS_PER_WEEK,
                days_of_week: days % DAYS_PER_WEEK,
            }
        } else {
            Self::Days { days }
        }
    }

    /// Days past the last whole month, regardless of variant.
    pub const fn days_in_month(&self) -> u32 {
        match *self {
            Self::Days { days } => days,
            Self::Weeks {
                weeks,
                days_of_week,
            } => weeks * DAYS_PER_WEEK + days_of_week,
        }
    }
}

/// A calendar-aware split of the time elapsed between two instants.
///
/// Years, months and days come from subtracting calendar fields with
/// borrowing, so month lengths and leap years are taken from the real
/// calendar. Hours, minutes, seconds and milliseconds are a flat
/// decomposition of the raw millisecond difference and never feed into the
/// calendar fields.
///
/// Breakdowns are recomputed from scratch on every reading; they have no
/// identity beyond their values.
///
/// # Example
///
/// ```
/// use capsule_clock::{DaySpan, DurationBreakdown, DurationOptions, Instant};
///
/// let start = Instant::parse("2024-01-31T00:00:00").unwrap();
/// let now = Instant::parse("2024-03-01T00:00:00").unwrap();
/// let d = DurationBreakdown::between(start, now, DurationOptions::default());
///
/// assert_eq!((d.years, d.months), (0, 1));
/// assert_eq!(d.days, DaySpan::Days { days: 1 });
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DurationBreakdown {
    /// Whole years.
    pub years: u32,
    /// Whole months past the last whole year, `0..=11`.
    pub months: u32,
    /// Days past the last whole month, optionally split into weeks.
    pub days: DaySpan,
    /// `0..=23`.
    pub hours: u32,
    /// `0..=59`.
    pub minutes: u32,
    /// `0..=59`.
    pub seconds: u32,
    /// `0..=999`, present only with [`DurationOptions::milliseconds`].
    pub milliseconds: Option<u32>,
}

impl DurationBreakdown {
    /// An all-zero breakdown shaped by `options`.
    pub const fn zero(options: DurationOptions) -> Self {
        Self {
            years: 0,
            months: 0,
            days: if options.weeks {
                DaySpan::Weeks {
                    weeks: 0,
                    days_of_week: 0,
                }
            } else {
                DaySpan::Days { days: 0 }
            },
            hours: 0,
            minutes: 0,
            seconds: 0,
            milliseconds: if options.milliseconds { Some(0) } else { None },
        }
    }

    /// Time elapsed from `start` to `now`.
    ///
    /// When `now` is not after `start` the result is [`Self::zero`]; fields
    /// are never negative.
    ///
    /// When the day field goes negative it borrows the length of the month
    /// before `now`'s month. If the start day is past the end of that month
    /// (a start on the 31st borrowing a 29-day February), the month's last
    /// day stands in as the month boundary, so the remainder is never
    /// negative and keeps growing day by day until the next whole month.
    pub fn between(start: Instant, now: Instant, options: DurationOptions) -> Self {
        let elapsed = now.millis_since(start);
        if elapsed <= 0 {
            return Self::zero(options);
        }

        let (from, to) = (start.naive(), now.naive());

        let mut years = i64::from(to.year()) - i64::from(from.year());
        let mut months = i64::from(to.month()) - i64::from(from.month());
        let mut days = i64::from(to.day()) - i64::from(from.day());

        if days < 0 {
            months -= 1;
            let (year, month) = previous_month(to.year(), to.month());
            let borrowed = i64::from(days_in_month(year, month));
            // A start day past the end of the borrowed month (Jan 31 against
            // a 29-day February) anchors on that month's last day.
            days = borrowed - i64::from(from.day()).min(borrowed) + i64::from(to.day());
        }

        if months < 0 {
            years -= 1;
            months += 12;
        }

        let elapsed = elapsed.unsigned_abs();

        Self {
            years: clamp_u32(years),
            months: clamp_u32(months),
            days: DaySpan::new(clamp_u32(days), options.weeks),
            hours: ((elapsed / MILLIS_PER_HOUR) % HOURS_PER_DAY) as u32,
            minutes: ((elapsed / MILLIS_PER_MINUTE) % 60) as u32,
            seconds: ((elapsed / MILLIS_PER_SECOND) % 60) as u32,
            milliseconds: options
                .milliseconds
                .then_some((elapsed % MILLIS_PER_SECOND) as u32),
        }
    }

    /// Returns `true` when every field is zero.
    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days.days_in_month() == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.milliseconds.unwrap_or(0) == 0
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl fmt::Display for DurationBreakdown {
    /// Renders `1y 2mo 3d 04:05:06`, with `2w 1d` in place of the day count
    /// when weeks are reported and a `.789` suffix for milliseconds.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}mo ", self.years, self.months)?;
        match self.days {
            DaySpan::Days { days } => write!(f, "{days}d ")?,
            DaySpan::Weeks {
                weeks,
                days_of_week,
            } => write!(f, "{weeks}w {days_of_week}d ")?,
        }
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )?;
        if let Some(ms) = self.milliseconds {
            write!(f, ".{ms:03}")?;
        }
        Ok(())
    }
}
