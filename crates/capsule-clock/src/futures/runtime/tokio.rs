use core::time::Duration;

use ::tokio::task::{JoinError, JoinHandle};

use crate::{Clock, Readout, SleepProvider, Ticker, TickerHandle};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    type Sleep = ::tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        ::tokio::time::sleep(dur)
    }
}

/// A ticker running as a Tokio task.
///
/// Returned by [`spawn_tokio`]. Dropping it detaches the task; call
/// [`stop`](Self::stop) to end it.
#[derive(Debug)]
pub struct TickerTask {
    handle: TickerHandle,
    task: JoinHandle<u64>,
}

impl TickerTask {
    /// Stops the ticker and cancels its task, releasing the pending timer.
    /// Idempotent.
    pub fn stop(&self) {
        self.handle.stop();
        self.task.abort();
    }

    /// A handle that stops the ticker without owning the task.
    pub fn handle(&self) -> TickerHandle {
        self.handle.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task to end and returns the number of readings
    /// delivered, or `None` if it was cancelled by [`stop`](Self::stop)
    /// while asleep.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the callback panicked.
    pub async fn join(self) -> Result<Option<u64>, JoinError> {
        match self.task.await {
            Ok(ticks) => Ok(Some(ticks)),
            Err(err) if err.is_cancelled() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Spawns `ticker` on the current Tokio runtime.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
///
/// # Example
///
/// ```
/// use capsule_clock::{DurationOptions, Elapsed, SystemClock, Ticker, spawn_tokio};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let start = capsule_clock::Instant::parse("2020-06-12").unwrap();
/// let ticker = Ticker::start(
///     SystemClock,
///     Elapsed::new(start, DurationOptions::default()),
///     1000,
///     |d| println!("{d}"),
/// );
///
/// let task = spawn_tokio(ticker);
/// task.stop();
/// assert_eq!(task.join().await.unwrap(), None);
/// # }
/// ```
pub fn spawn_tokio<C, R, F>(ticker: Ticker<C, R, F>) -> TickerTask
where
    C: Clock + Send + 'static,
    R: Readout + Send + 'static,
    F: FnMut(R::Output) + Send + 'static,
{
    let handle = ticker.handle();
    let task = ::tokio::spawn(ticker.run::<TokioSleep>());
    TickerTask { handle, task }
}
