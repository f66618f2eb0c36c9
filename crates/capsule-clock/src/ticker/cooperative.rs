use core::time::Duration;

use crate::{Clock, Instant, Readout, TickStatus, TickerHandle};

/// Smallest accepted tick interval. Smaller requests are raised to this.
pub const MIN_INTERVAL_MS: u64 = 1;

/// Re-evaluates a [`Readout`] on a fixed cadence and hands each reading to a
/// callback, until stopped.
///
/// The ticker is cooperative: it never spawns a thread or owns a timer
/// itself. Whoever drives it calls [`poll`](Self::poll), which fires at most
/// one tick and otherwise says how long to wait. Ticks of one ticker are
/// therefore strictly ordered and never overlap. The async runners in this
/// crate (`run`, `spawn_tokio`, `spawn_smol`) are such drivers; tests drive
/// it by hand with a [`ManualClock`].
///
/// ## Features
/// - ✅ First reading delivered synchronously by [`start`](Self::start)
/// - ✅ Fake clocks via [`Clock`]
/// - ✅ Stop from anywhere, including from inside the callback
///
/// # Example
///
/// ```
/// use capsule_clock::{DurationOptions, Elapsed, Instant, ManualClock, TickStatus, Ticker};
///
/// let clock = ManualClock::new(Instant::parse("2024-01-01T00:00:00").unwrap());
/// let start = Instant::parse("2023-12-31T23:59:58").unwrap();
///
/// let mut seen = Vec::new();
/// let mut ticker = Ticker::start(
///     clock.clone(),
///     Elapsed::new(start, DurationOptions::default()),
///     1000,
///     |d| seen.push(d.seconds),
/// );
///
/// clock.advance_millis(1000);
/// assert_eq!(ticker.poll(), TickStatus::Fired);
/// ticker.stop();
/// assert_eq!(ticker.poll(), TickStatus::Stopped);
/// drop(ticker);
///
/// assert_eq!(seen, vec![2, 3]);
/// ```
///
/// [`ManualClock`]: crate::ManualClock
pub struct Ticker<C, R, F>
where
    C: Clock,
    R: Readout,
    F: FnMut(R::Output),
{
    clock: C,
    readout: R,
    on_tick: F,
    interval_ms: u64,
    next_due: Instant,
    ticks: u64,
    handle: TickerHandle,
}

impl<C, R, F> Ticker<C, R, F>
where
    C: Clock,
    R: Readout,
    F: FnMut(R::Output),
{
    /// Starts ticking every `interval_ms`.
    ///
    /// `on_tick` receives the first reading before this returns, so a display
    /// never shows a placeholder. An interval of zero is raised to
    /// [`MIN_INTERVAL_MS`]; starting never fails.
    pub fn start(clock: C, readout: R, interval_ms: u64, on_tick: F) -> Self {
        Self::start_with(TickerHandle::new(), clock, readout, interval_ms, on_tick)
    }

    /// Like [`start`](Self::start), controlled by an existing `handle`.
    ///
    /// Useful when the callback itself holds a clone of the handle. If the
    /// handle is already stopped, nothing fires.
    pub fn start_with(
        handle: TickerHandle,
        clock: C,
        readout: R,
        interval_ms: u64,
        on_tick: F,
    ) -> Self {
        if interval_ms < MIN_INTERVAL_MS {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                requested = interval_ms,
                used = MIN_INTERVAL_MS,
                "tick interval raised to minimum"
            );
        }
        let interval_ms = interval_ms.max(MIN_INTERVAL_MS);

        let now = clock.now();
        let mut ticker = Self {
            clock,
            readout,
            on_tick,
            interval_ms,
            next_due: now,
            ticks: 0,
            handle,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(interval_ms, %now, "ticker started");

        if ticker.fire(now) {
            ticker.next_due = ticker.after_interval(now);
        }
        ticker
    }

    /// Fires the next tick if it is due.
    ///
    /// Deadlines advance by exactly one interval per tick, so a clock that
    /// moves one interval between polls yields one tick per poll with none
    /// skipped or repeated. If the driver falls more than one interval
    /// behind, the missed ticks are dropped and the schedule restarts from
    /// now rather than firing a burst.
    pub fn poll(&mut self) -> TickStatus {
        if self.handle.is_stopped() {
            return TickStatus::Stopped;
        }

        let now = self.clock.now();
        let early = self.next_due.millis_since(now);
        if early > 0 {
            return TickStatus::Pending {
                yield_for: Duration::from_millis(early.unsigned_abs()),
            };
        }

        if !self.fire(now) {
            return TickStatus::Stopped;
        }

        let late = early.unsigned_abs();
        self.next_due = if late >= self.interval_ms {
            #[cfg(feature = "tracing")]
            tracing::trace!(late_ms = late, "ticker fell behind; rescheduling");
            self.after_interval(now)
        } else {
            self.after_interval(self.next_due)
        };

        TickStatus::Fired
    }

    /// Stops this ticker. Same as stopping any clone of its handle.
    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }

    /// A handle that can stop this ticker from elsewhere.
    pub fn handle(&self) -> TickerHandle {
        self.handle.clone()
    }

    /// Number of readings delivered so far, including the first one.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// When the next tick is due.
    pub const fn next_due(&self) -> Instant {
        self.next_due
    }

    fn fire(&mut self, now: Instant) -> bool {
        let Some(_gate) = self.handle.enter() else {
            return false;
        };
        let reading = self.readout.read(now);
        (self.on_tick)(reading);
        self.ticks += 1;
        true
    }

    fn after_interval(&self, from: Instant) -> Instant {
        i64::try_from(self.interval_ms)
            .ok()
            .and_then(|interval| from.checked_add_millis(interval))
            .unwrap_or(Instant::MAX)
    }
}

impl<C, R, F> core::fmt::Debug for Ticker<C, R, F>
where
    C: Clock,
    R: Readout,
    F: FnMut(R::Output),
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ticker")
            .field("interval_ms", &self.interval_ms)
            .field("next_due", &self.next_due)
            .field("ticks", &self.ticks)
            .field("stopped", &self.handle.is_stopped())
            .finish_non_exhaustive()
    }
}
