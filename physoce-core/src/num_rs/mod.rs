//! numpy-flavoured array routines on top of [`ndarray`].

mod arange;
mod reduce;

pub use arange::*;
pub use reduce::*;
