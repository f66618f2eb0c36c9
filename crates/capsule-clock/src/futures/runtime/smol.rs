use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use ::smol::{Task, Timer};
use pin_project_lite::pin_project;

use crate::{Clock, Readout, SleepProvider, Ticker};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    type Sleep = SmolSleepFuture;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        SmolSleepFuture {
            timer: Timer::after(dur),
        }
    }
}

pin_project! {
    /// Internal future returned by [`SmolSleep::sleep_for`].
    ///
    /// This type wraps a [`smol::Timer`] and implements [`Future`] with `Output
    /// = ()`, discarding the timer's `Instant` result.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct SmolSleepFuture {
        #[pin]
        timer: Timer,
    }
}

impl Future for SmolSleepFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.project().timer.poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Spawns `ticker` on Smol's global executor.
///
/// Awaiting the task yields the number of readings delivered once the ticker
/// is stopped. Dropping the task cancels it, timer included; keep the
/// ticker's handle to stop it cleanly instead.
pub fn spawn_smol<C, R, F>(ticker: Ticker<C, R, F>) -> Task<u64>
where
    C: Clock + Send + 'static,
    R: Readout + Send + 'static,
    F: FnMut(R::Output) + Send + 'static,
{
    ::smol::spawn(ticker.run::<SmolSleep>())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::{CapsuleGate, Countdown, Instant, SystemClock, TickerHandle};

    #[test]
    fn drives_real_clock_until_stopped() {
        let handle = TickerHandle::new();
        let stopper = handle.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let ticker = Ticker::start_with(
            handle,
            SystemClock,
            |now: Instant| now,
            5,
            move |now| {
                let mut seen = sink.lock();
                seen.push(now);
                if seen.len() == 4 {
                    stopper.stop();
                }
            },
        );

        let ticks = ::smol::block_on(spawn_smol(ticker));
        assert_eq!(ticks, 4);

        let seen = seen.lock();
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn countdown_stops_when_gate_opens() {
        let handle = TickerHandle::new();
        let stopper = handle.clone();
        let target = SystemClock.now().checked_add_millis(30).unwrap();

        let ticker = Ticker::start_with(
            handle,
            SystemClock,
            Countdown::new(target),
            10,
            move |gate: CapsuleGate| {
                if gate.is_open() {
                    stopper.stop();
                }
            },
        );

        let ticks = ::smol::block_on(ticker.run::<SmolSleep>());
        assert!(ticks >= 2, "expected a locked reading before opening, got {ticks}");
    }
}
