use core::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{Error, Result};

/// Naive layouts accepted by [`Instant::parse`], tried in order.
///
/// `%.f` also matches an absent fractional part, and a missing seconds field
/// defaults to zero.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// An absolute point on the local wall clock, with millisecond resolution.
///
/// Instants are timezone-naive: two instants are compared by their calendar
/// fields only. Inputs carrying a UTC offset are converted to local time on
/// the way in, so everything downstream reads the same wall clock as
/// [`SystemClock`].
///
/// An `Instant` is valid by construction. Untrusted text goes through
/// [`Instant::parse`], which is where invalid dates surface.
///
/// [`SystemClock`]: crate::SystemClock
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(NaiveDateTime);

impl Instant {
    /// The earliest representable instant.
    pub const MIN: Self = Self(NaiveDateTime::MIN);

    /// The latest representable instant.
    pub const MAX: Self = Self(NaiveDateTime::MAX);

    /// Wraps a naive date-time, truncating anything below a millisecond.
    ///
    /// A leap second is folded into the last millisecond of its minute, so
    /// ordering and [`millis_since`](Self::millis_since) agree.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        let nanos = datetime.nanosecond().min(NANOS_PER_SECOND - 1);
        let millis_as_nanos = nanos / 1_000_000 * 1_000_000;
        Self(datetime.with_nanosecond(millis_as_nanos).unwrap_or(datetime))
    }

    /// Builds an instant from calendar fields. Returns `None` for impossible
    /// dates such as February 30th.
    pub fn from_ymd_hms_milli(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        milli: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_milli_opt(hour, minute, second, milli)
            .map(Self::from_naive)
    }

    /// Builds an instant from milliseconds since `1970-01-01T00:00:00`
    /// (wall clock, not UTC). Returns `None` outside the representable range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|dt| Self(dt.naive_utc()))
    }

    /// Milliseconds since `1970-01-01T00:00:00` on the same naive wall clock.
    pub fn as_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    /// Signed milliseconds from `earlier` to `self`; negative when `earlier`
    /// is actually later.
    pub fn millis_since(&self, earlier: Self) -> i64 {
        self.as_millis() - earlier.as_millis()
    }

    /// Shifts the instant by `millis`, returning `None` on overflow.
    pub fn checked_add_millis(self, millis: i64) -> Option<Self> {
        self.as_millis()
            .checked_add(millis)
            .and_then(Self::from_millis)
    }

    /// The underlying naive date-time.
    pub const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Parses an ISO-8601-like string.
    ///
    /// Accepted forms:
    ///
    /// - RFC 3339 with an offset (`2024-01-31T10:00:00Z`,
    ///   `2024-01-31T10:00:00.250+02:00`), converted to local wall time
    /// - a naive date-time with `T` or a space separator, seconds and
    ///   fractional seconds optional (`2024-01-31T10:00`)
    /// - a bare date (`2024-01-31`), read as local midnight
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for empty input or anything that does
    /// not name a real point in time.
    ///
    /// # Example
    ///
    /// ```
    /// use capsule_clock::Instant;
    ///
    /// let instant = Instant::parse("2024-02-29T12:30:00").unwrap();
    /// assert_eq!(instant.to_string(), "2024-02-29T12:30:00.000");
    ///
    /// assert!(Instant::parse("not-a-date").is_err());
    /// assert!(Instant::parse("2023-02-29").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_input(input, "empty input"));
        }

        // chrono encodes `:60` as a nanosecond count past one second.
        let leap_second = |nanos: u32| nanos >= NANOS_PER_SECOND;

        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            if leap_second(datetime.nanosecond()) {
                return Err(Error::invalid_input(input, "leap seconds are not supported"));
            }
            return Ok(Self::from_naive(
                datetime.with_timezone(&Local).naive_local(),
            ));
        }

        if let Some(datetime) = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        {
            if leap_second(datetime.nanosecond()) {
                return Err(Error::invalid_input(input, "leap seconds are not supported"));
            }
            return Ok(Self::from_naive(datetime));
        }

        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(|date| Self(date.and_time(NaiveTime::MIN)))
            .map_err(|_| Error::invalid_input(input, "expected an ISO-8601 date or date-time"))
    }
}

impl From<NaiveDateTime> for Instant {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::from_naive(datetime)
    }
}

impl FromStr for Instant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
impl serde::Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct InstantVisitor;

        impl serde::de::Visitor<'_> for InstantVisitor {
            type Value = Instant;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an ISO-8601 date or date-time string")
            }

            fn visit_str<E>(self, v: &str) -> core::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Instant::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(InstantVisitor)
    }
}
