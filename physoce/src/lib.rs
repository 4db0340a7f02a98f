//! Numerical tools for physical oceanography.
//!
//! - [`signal::lombscargle()`]: Lomb-Scargle Fourier transform and periodogram
//!   for unevenly sampled time series.
//! - [`signal::windows`]: taper windows in the manner of `scipy.signal`.
//! - [`oceans`]: Coriolis parameters and log-layer bottom stress.
//! - [`gm81`]: Garrett-Munk internal-wave spectrum.
//! - [`altimetry`]: geostrophic velocity from sea level anomaly.
//!
//! Enable the `parallel` feature to evaluate Lomb-Scargle frequencies on the
//! rayon thread pool.
#![deny(missing_docs)]

mod error;
pub use error::Error;

/// Shared kernel substrate: lifecycle trait, buffer adapters, errors.
pub mod kernel;

/// Signal processing.
pub mod signal;

/// Special math functions.
pub mod special;

pub mod altimetry;
pub mod gm81;
pub mod oceans;

/// Result alias for the convenience functions.
pub type Result<T> = core::result::Result<T, Error>;
