mod breakdown;
mod calendar;
mod compute;

pub use breakdown::*;
pub use calendar::*;
pub use compute::*;
