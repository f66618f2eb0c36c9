use crate::{CapsuleGate, DurationBreakdown, DurationOptions, Instant};

/// A pure function of "now" that a [`Ticker`] re-evaluates on every tick.
///
/// Any `Fn(Instant) -> T` is a readout, so ad hoc displays need no new type.
///
/// [`Ticker`]: crate::Ticker
pub trait Readout {
    type Output;

    fn read(&self, now: Instant) -> Self::Output;
}

impl<F, T> Readout for F
where
    F: Fn(Instant) -> T,
{
    type Output = T;

    fn read(&self, now: Instant) -> T {
        self(now)
    }
}

/// Time elapsed since a fixed start, e.g. a relationship start date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elapsed {
    pub start: Instant,
    pub options: DurationOptions,
}

impl Elapsed {
    pub const fn new(start: Instant, options: DurationOptions) -> Self {
        Self { start, options }
    }
}

impl Readout for Elapsed {
    type Output = DurationBreakdown;

    fn read(&self, now: Instant) -> DurationBreakdown {
        DurationBreakdown::between(self.start, now, self.options)
    }
}

/// The open-date gate of a capsule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub target: Instant,
}

impl Countdown {
    pub const fn new(target: Instant) -> Self {
        Self { target }
    }
}

impl Readout for Countdown {
    type Output = CapsuleGate;

    fn read(&self, now: Instant) -> CapsuleGate {
        CapsuleGate::at(self.target, now)
    }
}
