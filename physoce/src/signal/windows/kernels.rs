//! Config-driven taper generation.

use crate::kernel::{check_len, ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D};
use crate::signal::traits::WindowGenerate;
use crate::special::Bessel;
use num_traits::{Float, FloatConst};

use super::{get_window, GetWindow, GetWindowBuilder, Window};

/// Window family with owned parameters, for storing in configs.
///
/// Defaults to [`WindowBuilderOwned::Boxcar`], which leaves data untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowBuilderOwned<F> {
    /// Rectangular, no taper.
    Boxcar,
    /// Raised cosine.
    Hann,
    /// Hamming, `0.54 - 0.46 cos`.
    Hamming,
    /// Three-term Blackman.
    Blackman,
    /// Four-term Nuttall.
    Nuttall,
    /// Triangular with non-zero ends.
    Triangle,
    /// Kaiser with shape `beta`.
    Kaiser {
        /// Shape parameter; 0 is a boxcar.
        beta: F,
    },
    /// Generalized Gaussian.
    GeneralGaussian {
        /// Shape parameter.
        p: F,
        /// Standard deviation in samples.
        width: F,
    },
    /// Generalized Hamming with coefficient `alpha`.
    GeneralHamming {
        /// Coefficient `alpha`.
        coefficient: F,
    },
    /// Arbitrary sum of cosine terms.
    GeneralCosine {
        /// Weights of `cos(k x)`, `k = 0, 1, ...`.
        weights: Vec<F>,
    },
}

impl<F> Default for WindowBuilderOwned<F> {
    fn default() -> Self {
        WindowBuilderOwned::Boxcar
    }
}

impl<F> WindowBuilderOwned<F> {
    /// Name of the window family as `scipy.signal.get_window` spells it.
    pub fn name(&self) -> &'static str {
        match self {
            WindowBuilderOwned::Boxcar => "boxcar",
            WindowBuilderOwned::Hann => "hann",
            WindowBuilderOwned::Hamming => "hamming",
            WindowBuilderOwned::Blackman => "blackman",
            WindowBuilderOwned::Nuttall => "nuttall",
            WindowBuilderOwned::Triangle => "triang",
            WindowBuilderOwned::Kaiser { .. } => "kaiser",
            WindowBuilderOwned::GeneralGaussian { .. } => "general_gaussian",
            WindowBuilderOwned::GeneralHamming { .. } => "general_hamming",
            WindowBuilderOwned::GeneralCosine { .. } => "general_cosine",
        }
    }

    /// Whether applying this window leaves samples unchanged.
    pub fn is_boxcar(&self) -> bool {
        matches!(self, WindowBuilderOwned::Boxcar)
    }
}

impl<F> WindowBuilderOwned<F>
where
    F: Float,
{
    fn borrowed(&self) -> GetWindowBuilder<'_, F> {
        match self {
            WindowBuilderOwned::Boxcar => GetWindowBuilder::Boxcar,
            WindowBuilderOwned::Hann => GetWindowBuilder::Hann,
            WindowBuilderOwned::Hamming => GetWindowBuilder::Hamming,
            WindowBuilderOwned::Blackman => GetWindowBuilder::Blackman,
            WindowBuilderOwned::Nuttall => GetWindowBuilder::Nuttall,
            WindowBuilderOwned::Triangle => GetWindowBuilder::Triangle,
            &WindowBuilderOwned::Kaiser { beta } => GetWindowBuilder::Kaiser { beta },
            &WindowBuilderOwned::GeneralGaussian { p, width } => {
                GetWindowBuilder::GeneralGaussian { p, width }
            }
            &WindowBuilderOwned::GeneralHamming { coefficient } => {
                GetWindowBuilder::GeneralHamming { coefficient }
            }
            WindowBuilderOwned::GeneralCosine { weights } => GetWindowBuilder::GeneralCosine {
                weights: weights.as_slice(),
            },
        }
    }

    /// Concrete [`Window`] of length `nx`; see [`get_window`] for `fftbins`.
    pub fn build_window(&self, nx: usize, fftbins: Option<bool>) -> Window<F> {
        get_window(self.borrowed(), nx, fftbins)
    }

    /// Reject parameters that would produce a non-finite taper.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            WindowBuilderOwned::Kaiser { beta } if !beta.is_finite() => {
                Err(ConfigError::InvalidArgument {
                    arg: "beta",
                    reason: "kaiser beta must be finite",
                })
            }
            WindowBuilderOwned::GeneralGaussian { width, .. }
                if !(width.is_finite() && *width > F::zero()) =>
            {
                Err(ConfigError::InvalidArgument {
                    arg: "width",
                    reason: "gaussian width must be finite and > 0",
                })
            }
            WindowBuilderOwned::GeneralCosine { weights } if weights.is_empty() => {
                Err(ConfigError::EmptyInput { arg: "weights" })
            }
            _ => Ok(()),
        }
    }
}

/// Scale `w` in place so that it sums to its length.
pub(super) fn rescale_to_len<F: Float>(w: &mut [F]) {
    let n = F::from(w.len()).unwrap_or_else(F::nan);
    let sum = w.iter().fold(F::zero(), |acc, &v| acc + v);
    let scale = n / sum;
    w.iter_mut().for_each(|v| *v = *v * scale);
}

/// Constructor config for [`WindowKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig<F> {
    /// Window family and parameters.
    pub builder: WindowBuilderOwned<F>,
    /// Output length.
    pub nx: usize,
    /// `Some(true)` or `None` for the periodic form, `Some(false)` for the
    /// symmetric one.
    pub fftbins: Option<bool>,
    /// Rescale so the weights sum to `nx`, preserving signal variance on
    /// average when tapering.
    pub normalize: bool,
}

/// Validated window generator.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowKernel<F> {
    config: WindowConfig<F>,
}

impl<F> KernelLifecycle for WindowKernel<F>
where
    F: Float,
{
    type Config = WindowConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.nx == 0 {
            return Err(ConfigError::EmptyInput { arg: "nx" });
        }
        config.builder.validate()?;
        Ok(Self { config })
    }
}

impl<F> WindowKernel<F> {
    /// Number of samples produced.
    pub fn len(&self) -> usize {
        self.config.nx
    }

    /// Whether no samples are produced; construction rejects `nx == 0`.
    pub fn is_empty(&self) -> bool {
        self.config.nx == 0
    }
}

impl<F> WindowGenerate<F> for WindowKernel<F>
where
    F: Float + FloatConst + Bessel,
{
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<F> + ?Sized,
    {
        let out = out
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        check_len("out", self.config.nx, out.len())?;
        out.copy_from_slice(&self.run_alloc()?);
        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<F>, ExecInvariantViolation> {
        let cfg = &self.config;
        let mut w = cfg.builder.build_window(cfg.nx, cfg.fftbins).get_window();
        if cfg.normalize {
            rescale_to_len(&mut w);
        }
        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::windows::{Hann, Kaiser};
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    fn config(builder: WindowBuilderOwned<f64>, nx: usize) -> WindowConfig<f64> {
        WindowConfig {
            builder,
            nx,
            fftbins: None,
            normalize: false,
        }
    }

    #[test]
    fn periodic_by_default_symmetric_on_request() {
        let periodic = WindowKernel::try_new(config(WindowBuilderOwned::Hann, 16))
            .expect("valid config")
            .run_alloc()
            .expect("hann");
        let expected: Vec<f64> = Hann::new(16, false).get_window();
        assert_eq!(periodic, expected);

        let symmetric = WindowKernel::try_new(WindowConfig {
            fftbins: Some(false),
            ..config(WindowBuilderOwned::Kaiser { beta: 5.0 }, 9)
        })
        .expect("valid config")
        .run_alloc()
        .expect("kaiser");
        let expected: Vec<f64> = Kaiser::new(9, 5.0, true).get_window();
        assert_eq!(symmetric, expected);
    }

    #[test]
    fn normalized_taper_sums_to_length() {
        let kernel = WindowKernel::try_new(WindowConfig {
            normalize: true,
            ..config(WindowBuilderOwned::Blackman, 24)
        })
        .expect("valid config");
        let w = kernel.run_alloc().expect("blackman");
        assert_abs_diff_eq!(w.iter().sum::<f64>(), 24.0, epsilon = 1e-10);
    }

    #[test]
    fn run_into_checks_output_length() {
        let kernel = WindowKernel::try_new(config(WindowBuilderOwned::Boxcar, 8))
            .expect("valid config");
        let mut out = Array1::from(vec![0.0f64; 8]);
        kernel.run_into(&mut out).expect("matching length");
        out.iter()
            .for_each(|v| assert_abs_diff_eq!(*v, 1.0f64, epsilon = 1e-12));

        let mut short = vec![0.0f64; 7];
        let err = kernel.run_into(&mut short).expect_err("short output");
        assert_eq!(
            err,
            ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: 8,
                got: 7,
            }
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let cases = [
            (config(WindowBuilderOwned::Hann, 0), ConfigError::EmptyInput { arg: "nx" }),
            (
                config(WindowBuilderOwned::GeneralCosine { weights: Vec::new() }, 8),
                ConfigError::EmptyInput { arg: "weights" },
            ),
            (
                config(WindowBuilderOwned::Kaiser { beta: f64::INFINITY }, 8),
                ConfigError::InvalidArgument {
                    arg: "beta",
                    reason: "kaiser beta must be finite",
                },
            ),
            (
                config(WindowBuilderOwned::GeneralGaussian { p: 1.0, width: 0.0 }, 8),
                ConfigError::InvalidArgument {
                    arg: "width",
                    reason: "gaussian width must be finite and > 0",
                },
            ),
        ];
        for (cfg, expected) in cases {
            assert_eq!(WindowKernel::try_new(cfg).expect_err("invalid"), expected);
        }
    }

    #[test]
    fn names_round_trip_through_parse() {
        for builder in [
            WindowBuilderOwned::<f64>::Boxcar,
            WindowBuilderOwned::Hann,
            WindowBuilderOwned::Hamming,
            WindowBuilderOwned::Blackman,
            WindowBuilderOwned::Nuttall,
            WindowBuilderOwned::Triangle,
        ] {
            assert_eq!(builder.name().parse::<WindowBuilderOwned<f64>>(), Ok(builder));
        }
        assert_eq!(WindowBuilderOwned::Kaiser { beta: 1.0 }.name(), "kaiser");
    }
}
