use core::{
    future::Future,
    marker::PhantomData,
    pin::Pin,
    task::{Context, Poll},
};

use pin_project_lite::pin_project;

use super::SleepProvider;
use crate::{Clock, Readout, TickStatus, Ticker};

impl<C, R, F> Ticker<C, R, F>
where
    C: Clock,
    R: Readout,
    F: FnMut(R::Output),
{
    /// Drives this ticker until it is stopped, sleeping between ticks with
    /// `S`. Resolves to the number of readings delivered.
    ///
    /// A stop issued while the future is asleep is observed when it wakes;
    /// no callback runs after the stop either way. Dropping the future also
    /// ends the ticker, which is what `spawn_tokio` and `spawn_smol` rely on
    /// to release the timer immediately.
    pub fn run<S>(self) -> TickerFuture<C, R, F, S>
    where
        S: SleepProvider,
    {
        TickerFuture::new(self)
    }
}

pin_project! {
    /// A future that polls a [`Ticker`] on its cadence until it stops.
    ///
    /// Between ticks it sleeps for the wait the ticker reports, using the
    /// chosen [`SleepProvider`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct TickerFuture<C, R, F, S>
    where
        C: Clock,
        R: Readout,
        F: FnMut(R::Output),
        S: SleepProvider,
    {
        ticker: Ticker<C, R, F>,
        #[pin]
        sleep: Option<S::Sleep>,
        _sleep: PhantomData<S>,
    }
}

impl<C, R, F, S> TickerFuture<C, R, F, S>
where
    C: Clock,
    R: Readout,
    F: FnMut(R::Output),
    S: SleepProvider,
{
    /// Wraps a started ticker. Nothing further fires until the future is
    /// polled.
    pub fn new(ticker: Ticker<C, R, F>) -> Self {
        Self {
            ticker,
            sleep: None,
            _sleep: PhantomData,
        }
    }

    pub fn ticker(&self) -> &Ticker<C, R, F> {
        &self.ticker
    }
}

impl<C, R, F, S> Future for TickerFuture<C, R, F, S>
where
    C: Clock,
    R: Readout,
    F: FnMut(R::Output),
    S: SleepProvider,
{
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            if let Some(sleep) = this.sleep.as_mut().as_pin_mut() {
                match sleep.poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(()) => this.sleep.set(None),
                }
            }

            match this.ticker.poll() {
                TickStatus::Fired => {}
                TickStatus::Pending { yield_for } => {
                    this.sleep.set(Some(S::sleep_for(yield_for)));
                }
                TickStatus::Stopped => return Poll::Ready(this.ticker.ticks()),
            }
        }
    }
}
