//! Signal processing: spectral estimation for unevenly sampled series and
//! the window functions it tapers with.

pub mod lombscargle;
pub mod traits;
pub mod windows;

pub use lombscargle::{
    lombscargle, LombScargleConfig, LombScargleKernel, LombScargleResult, Scaling,
};
