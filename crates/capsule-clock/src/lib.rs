#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod countdown;
mod duration;
mod error;
#[cfg(feature = "futures")]
mod futures;
mod instant;
mod readout;
mod ticker;
mod time;

pub use crate::countdown::*;
pub use crate::duration::*;
pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::instant::*;
pub use crate::readout::*;
pub use crate::ticker::*;
pub use crate::time::*;
