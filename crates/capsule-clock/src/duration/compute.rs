use crate::{Clock, DurationBreakdown, DurationOptions, Instant, Result, SystemClock};

/// Parses `start` and returns the time elapsed until `now`.
///
/// `now` defaults to the local wall clock. Use [`compute_duration_with`] to
/// inject a clock instead.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `start` is not a valid date or
/// date-time. An unparseable start never yields a zeroed breakdown; the
/// caller decides what to show instead.
///
/// # Example
///
/// ```
/// use capsule_clock::{compute_duration, DurationOptions, Instant};
///
/// let now = Instant::parse("2024-03-01T00:00:00").ok();
/// let elapsed = compute_duration("2023-02-28", now, DurationOptions::default()).unwrap();
/// assert_eq!((elapsed.years, elapsed.months), (1, 0));
///
/// assert!(compute_duration("not-a-date", now, DurationOptions::default()).is_err());
/// ```
///
/// [`Error::InvalidInput`]: crate::Error::InvalidInput
pub fn compute_duration(
    start: &str,
    now: Option<Instant>,
    options: DurationOptions,
) -> Result<DurationBreakdown> {
    let start = Instant::parse(start)?;
    let now = now.unwrap_or_else(|| SystemClock.now());
    Ok(DurationBreakdown::between(start, now, options))
}

/// Like [`compute_duration`], reading "now" from `clock`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `start` is not a valid date or
/// date-time.
///
/// [`Error::InvalidInput`]: crate::Error::InvalidInput
pub fn compute_duration_with<C>(
    start: &str,
    clock: &C,
    options: DurationOptions,
) -> Result<DurationBreakdown>
where
    C: Clock + ?Sized,
{
    compute_duration(start, Some(clock.now()), options)
}
