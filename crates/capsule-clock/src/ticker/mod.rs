mod cooperative;
mod handle;
mod status;
#[cfg(test)]
mod tests;

pub use cooperative::*;
pub use handle::*;
pub use status::*;
