//! Trait interfaces for signal-processing capabilities.
//!
//! Kernels are built once from a validated config and then run against
//! borrowed inputs, either into caller buffers (`run_into`) or into freshly
//! allocated outputs (`run_alloc`).

use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};
use crate::signal::lombscargle::LombScargleResult;
use rustfft::num_complex::Complex;

/// Generalized Fourier transform and periodogram of a possibly unevenly
/// sampled series with sample values of type `X`.
pub trait LombScargle1D<X> {
    /// Run the estimator into caller-provided buffers.
    ///
    /// All three outputs must have the frequency-grid length.
    fn run_into<IT, IX, OF, OC, OP>(
        &self,
        t: &IT,
        x: &IX,
        freqs: &mut OF,
        coeffs: &mut OC,
        pxx: &mut OP,
    ) -> Result<(), ExecInvariantViolation>
    where
        IT: Read1D<f64> + ?Sized,
        IX: Read1D<X> + ?Sized,
        OF: Write1D<f64> + ?Sized,
        OC: Write1D<Complex<f64>> + ?Sized,
        OP: Write1D<f64> + ?Sized;

    /// Run the estimator and allocate the outputs.
    fn run_alloc<IT, IX>(&self, t: &IT, x: &IX) -> Result<LombScargleResult, ExecInvariantViolation>
    where
        IT: Read1D<f64> + ?Sized,
        IX: Read1D<X> + ?Sized;
}

/// Window generation capability.
pub trait WindowGenerate<T> {
    /// Run window generation into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<T> + ?Sized;

    /// Run window generation and allocate output samples.
    fn run_alloc(&self) -> Result<Vec<T>, ExecInvariantViolation>;
}
