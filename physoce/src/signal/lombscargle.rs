//! Lomb-Scargle discrete Fourier transform and periodogram for unevenly
//! sampled data, following Scargle (1989).
//!
//! Unlike the classical Lomb-Scargle power estimate, this generalized form
//! returns complex coefficients. They reduce to the ordinary DFT magnitudes
//! when the samples are evenly spaced, and complex-valued series are
//! supported (always giving a two-sided spectrum).
//!
//! Scargle, J.D. (1989) Studies in astronomical time series analysis III:
//! Fourier transforms, autocorrelation functions, and cross-correlation
//! functions of unevenly spaced data. The Astrophysical Journal, 343, 874-887.
//!
//! ```
//! use physoce::signal::{lombscargle, LombScargleConfig};
//!
//! let t: Vec<f64> = (0..8).map(f64::from).collect();
//! let x: Vec<f64> = t
//!     .iter()
//!     .map(|&ti| (2.0 * core::f64::consts::PI * ti / 4.0).sin())
//!     .collect();
//!
//! let out = lombscargle(&t, &x, LombScargleConfig::default()).unwrap();
//! assert_eq!(out.frequencies.len(), 16);
//! assert_eq!(out.frequencies[7], 0.25);
//! ```

use crate::kernel::{
    check_len, require_positive, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D,
    Write1D,
};
use crate::signal::traits::LombScargle1D;
use crate::signal::windows::{normalized_weights, WindowBuilderOwned};
use crate::Error;
use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;
use ndarray::ArrayView1;
use physoce_core::num_rs::{arange, mean_step};
use rustfft::num_complex::Complex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How the periodogram is derived from the transform coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scaling {
    /// `|F|² / N`, in units of `x²`.
    #[default]
    Classical,
    /// `|F|² · dt / N`, a power spectral density in units of `x²/f`, with
    /// `dt` the mean sampling interval.
    Density,
}

impl Scaling {
    fn apply(self, coeff: Complex<f64>, n: f64, dt: f64) -> f64 {
        match self {
            Scaling::Classical => coeff.norm_sqr() / n,
            Scaling::Density => coeff.norm_sqr() / n * dt,
        }
    }
}

impl FromStr for Scaling {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classical" => Ok(Scaling::Classical),
            "density" => Ok(Scaling::Density),
            _ => Err(ConfigError::InvalidScaling { got: s.into() }),
        }
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scaling::Classical => f.write_str("classical"),
            Scaling::Density => f.write_str("density"),
        }
    }
}

/// Constructor config for [`LombScargleKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LombScargleConfig {
    /// Oversampling factor: ratio of the number of frequencies to the number
    /// of samples. Adjacent frequencies are `1 / (dt · N · ofac)` apart.
    /// Default 4.
    pub ofac: f64,
    /// Highest frequency as a multiple of the pseudo-Nyquist frequency
    /// `1 / (2 dt)`. Default 1.
    pub hifac: f64,
    /// Time origin for the phase of the coefficients. `None` uses the first
    /// sample time.
    pub t0: Option<f64>,
    /// Return only non-negative frequencies for real data. Complex data
    /// always yields a two-sided spectrum. Default `true`.
    pub return_onesided: bool,
    /// Evaluate the zero frequency through its well-defined limit.
    /// Default `false`.
    pub return_zero: bool,
    /// Taper applied to the samples; weights are rescaled to sum to N.
    /// Default boxcar.
    pub window: WindowBuilderOwned<f64>,
    /// Periodogram scaling. Default [`Scaling::Classical`].
    pub scaling: Scaling,
}

impl Default for LombScargleConfig {
    fn default() -> Self {
        Self {
            ofac: 4.0,
            hifac: 1.0,
            t0: None,
            return_onesided: true,
            return_zero: false,
            window: WindowBuilderOwned::Boxcar,
            scaling: Scaling::Classical,
        }
    }
}

/// Frequencies, transform coefficients and periodogram, co-indexed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LombScargleResult {
    /// Frequency grid, in cycles per unit of `t`.
    pub frequencies: Vec<f64>,
    /// Complex generalized Fourier coefficients.
    pub coefficients: Vec<Complex<f64>>,
    /// Periodogram, proportional to `|coefficient|²`.
    pub periodogram: Vec<f64>,
}

impl LombScargleResult {
    /// Number of evaluated frequencies.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether no frequency was evaluated.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Trait-first Lomb-Scargle kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct LombScargleKernel {
    ofac: f64,
    hifac: f64,
    t0: Option<f64>,
    return_onesided: bool,
    return_zero: bool,
    window: WindowBuilderOwned<f64>,
    scaling: Scaling,
}

impl KernelLifecycle for LombScargleKernel {
    type Config = LombScargleConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        require_positive("ofac", config.ofac)?;
        require_positive("hifac", config.hifac)?;
        config.window.validate()?;
        Ok(Self {
            ofac: config.ofac,
            hifac: config.hifac,
            t0: config.t0,
            return_onesided: config.return_onesided,
            return_zero: config.return_zero,
            window: config.window,
            scaling: config.scaling,
        })
    }
}

/// Windowed samples and the grid they are evaluated on.
struct Prepared<'a> {
    t: &'a [f64],
    x: Vec<Complex<f64>>,
    dt: f64,
    t0: f64,
    freqs: Vec<f64>,
}

impl LombScargleKernel {
    /// Periodogram scaling in use.
    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    /// Frequency grid the estimator evaluates for this series.
    pub fn frequency_grid<IT, IX, X>(&self, t: &IT, x: &IX) -> Result<Vec<f64>, ExecInvariantViolation>
    where
        IT: Read1D<f64> + ?Sized,
        IX: Read1D<X> + ?Sized,
        X: Copy + Into<Complex<f64>>,
    {
        Ok(self.prepare(t, x)?.freqs)
    }

    /// Length of the frequency grid, for sizing `run_into` buffers.
    pub fn expected_len<IT, IX, X>(&self, t: &IT, x: &IX) -> Result<usize, ExecInvariantViolation>
    where
        IT: Read1D<f64> + ?Sized,
        IX: Read1D<X> + ?Sized,
        X: Copy + Into<Complex<f64>>,
    {
        Ok(self.frequency_grid(t, x)?.len())
    }

    fn prepare<'a, IT, IX, X>(
        &self,
        t: &'a IT,
        x: &IX,
    ) -> Result<Prepared<'a>, ExecInvariantViolation>
    where
        IT: Read1D<f64> + ?Sized,
        IX: Read1D<X> + ?Sized,
        X: Copy + Into<Complex<f64>>,
    {
        let t = t.read_slice().map_err(ExecInvariantViolation::from)?;
        let x = x.read_slice().map_err(ExecInvariantViolation::from)?;
        if x.is_empty() {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "lombscargle input must be non-empty",
            });
        }
        check_len("t", x.len(), t.len())?;

        let n = x.len();
        let x: Vec<Complex<f64>> = if self.window.is_boxcar() {
            x.iter().map(|&v| Into::<Complex<f64>>::into(v)).collect()
        } else {
            let weights = normalized_weights(&self.window, n);
            x.iter()
                .zip(weights.iter())
                .map(|(&v, &w)| Into::<Complex<f64>>::into(v) * w)
                .collect()
        };

        let dt = mean_step(ArrayView1::from(t));
        let complex = x.iter().any(|v| v.im != 0.0);
        let freqs = self.grid(dt, n, complex)?;
        log::debug!(
            "lombscargle: n={n} dt={dt} nfreq={} complex={complex}",
            freqs.len()
        );

        Ok(Prepared {
            t,
            x,
            dt,
            t0: self.t0.unwrap_or(t[0]),
            freqs,
        })
    }

    fn grid(&self, dt: f64, n: usize, complex: bool) -> Result<Vec<f64>, ExecInvariantViolation> {
        let positive = if dt.is_finite() && dt != 0.0 {
            let flo = (1.0 / dt) / (n as f64 * self.ofac);
            let fhi = self.hifac * (1.0 / (2.0 * dt));
            arange(flo, fhi + flo, flo)
                .map_err(|_| ExecInvariantViolation::InvalidState {
                    reason: "frequency grid length is not representable",
                })?
                .to_vec()
        } else {
            log::warn!("lombscargle: degenerate sampling interval {dt}, no nonzero frequencies");
            Vec::new()
        };

        let onesided = self.return_onesided && !complex;
        if complex && self.return_onesided {
            log::debug!("lombscargle: complex input, returning a two-sided spectrum");
        }

        let zero = usize::from(self.return_zero);
        let mut freqs = Vec::with_capacity(if onesided {
            positive.len() + zero
        } else {
            2 * positive.len() + zero
        });
        if !onesided {
            freqs.extend(positive.iter().rev().map(|f| -f));
        }
        if self.return_zero {
            freqs.push(0.0);
        }
        freqs.extend_from_slice(&positive);
        Ok(freqs)
    }

    fn coefficients(&self, prepared: &Prepared<'_>) -> Vec<Complex<f64>> {
        let Prepared { t, x, t0, freqs, .. } = prepared;
        log::trace!("lombscargle: evaluating {} frequencies", freqs.len());

        #[cfg(feature = "parallel")]
        let coeffs = freqs
            .par_iter()
            .map(|&fk| coefficient(t, x, *t0, fk))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let coeffs = freqs
            .iter()
            .map(|&fk| coefficient(t, x, *t0, fk))
            .collect();

        coeffs
    }
}

/// Generalized Fourier coefficient of `x` at frequency `fk`.
fn coefficient(t: &[f64], x: &[Complex<f64>], t0: f64, fk: f64) -> Complex<f64> {
    let n = x.len() as f64;

    if fk == 0.0 {
        // Limit as the frequency approaches zero.
        return x.iter().sum::<Complex<f64>>() / n.sqrt();
    }

    let w = 2.0 * PI * fk;
    let two_w = 2.0 * w;
    let (s2, c2) = t.iter().fold((0.0, 0.0), |(s, c), &ti| {
        let (sin, cos) = (two_w * ti).sin_cos();
        (s + sin, c + cos)
    });
    let tau = s2.atan2(c2) / two_w;

    let (cc, ss) = t.iter().fold((0.0, 0.0), |(cc, ss), &ti| {
        let (sin, cos) = (w * (ti - tau)).sin_cos();
        (cc + cos * cos, ss + sin * sin)
    });
    let a = cc.powf(-0.5);
    let b = ss.powf(-0.5);

    // Scargle (1989) prints a plus sign before the sine term; the minus sign
    // is the correct one and only matters for complex x.
    let sum: Complex<f64> = t
        .iter()
        .zip(x.iter())
        .map(|(&ti, &xi)| {
            let (sin, cos) = (w * (ti - tau)).sin_cos();
            xi * Complex::new(a * cos, -b * sin)
        })
        .sum();

    Complex::from_polar((n / 2.0).sqrt(), -w * t0) * sum
}

impl<X> LombScargle1D<X> for LombScargleKernel
where
    X: Copy + Into<Complex<f64>>,
{
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
        OP: Write1D<f64> + ?Sized,
    {
        let prepared = self.prepare(t, x)?;
        let expected = prepared.freqs.len();

        let f_out = freqs
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        check_len("freqs", expected, f_out.len())?;
        let c_out = coeffs
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        check_len("coeffs", expected, c_out.len())?;
        let p_out = pxx
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        check_len("pxx", expected, p_out.len())?;

        let c = self.coefficients(&prepared);
        let n = prepared.x.len() as f64;
        f_out.copy_from_slice(&prepared.freqs);
        for ((co, po), ci) in c_out.iter_mut().zip(p_out.iter_mut()).zip(c) {
            *co = ci;
            *po = self.scaling.apply(ci, n, prepared.dt);
        }
        Ok(())
    }

    fn run_alloc<IT, IX>(&self, t: &IT, x: &IX) -> Result<LombScargleResult, ExecInvariantViolation>
    where
        IT: Read1D<f64> + ?Sized,
        IX: Read1D<X> + ?Sized,
    {
        let prepared = self.prepare(t, x)?;
        let coefficients = self.coefficients(&prepared);
        let n = prepared.x.len() as f64;
        let periodogram = coefficients
            .iter()
            .map(|&c| self.scaling.apply(c, n, prepared.dt))
            .collect();
        Ok(LombScargleResult {
            frequencies: prepared.freqs,
            coefficients,
            periodogram,
        })
    }
}

/// Discrete Fourier transform and periodogram of unevenly spaced data.
///
/// `x` may be real (`f64`) or complex (`Complex<f64>`).
pub fn lombscargle<X>(
    t: &[f64],
    x: &[X],
    config: LombScargleConfig,
) -> Result<LombScargleResult, Error>
where
    X: Copy + Into<Complex<f64>>,
{
    let kernel = LombScargleKernel::try_new(config)?;
    Ok(kernel.run_alloc(t, x)?)
}
