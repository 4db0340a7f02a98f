//! Window functions analogous to `scipy.signal.windows` and
//! `scipy.signal.get_window`.
//!
//! Every window is constructed with a length `m` and a symmetry flag. A
//! symmetric window (`sym = true`) is meant for filter design; a periodic
//! one (`sym = false`) is computed with length `m + 1` and truncated, which
//! is what spectral estimators want and what [`get_window`] returns unless
//! told otherwise.

mod kernels;

pub use kernels::*;
use kernels::rescale_to_len;

use crate::kernel::ConfigError;
use crate::special::Bessel;
use core::str::FromStr;
use num_traits::{Float, FloatConst};

/// Types that can produce window samples.
pub trait GetWindow<F> {
    /// Compute the window samples.
    fn get_window(&self) -> Vec<F>;
}

fn cast<F: Float>(v: f64) -> F {
    F::from(v).unwrap_or_else(F::nan)
}

/// Length of the computed window and whether it must be truncated after.
fn extend(m: usize, sym: bool) -> (usize, bool) {
    if sym {
        (m, false)
    } else {
        (m + 1, true)
    }
}

fn truncate<F>(mut w: Vec<F>, needs_trunc: bool) -> Vec<F> {
    if needs_trunc {
        w.pop();
    }
    w
}

/// `numpy.linspace(start, stop, num)` with the endpoint included.
fn linspace<F: Float>(start: F, stop: F, num: usize) -> Vec<F> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / cast::<F>((num - 1) as f64);
            (0..num)
                .map(|i| start + cast::<F>(i as f64) * step)
                .collect()
        }
    }
}

fn general_cosine_impl<F>(m: usize, a: &[F], sym: bool) -> Vec<F>
where
    F: Float + FloatConst,
{
    if m <= 1 {
        return vec![F::one(); m];
    }
    let (m, needs_trunc) = extend(m, sym);
    let fac = linspace(-F::PI(), F::PI(), m);
    let w = fac
        .iter()
        .map(|&x| {
            a.iter().enumerate().fold(F::zero(), |acc, (k, &ak)| {
                acc + ak * (cast::<F>(k as f64) * x).cos()
            })
        })
        .collect();
    truncate(w, needs_trunc)
}

/// Rectangular window; leaves the data unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boxcar {
    /// Number of points.
    pub m: usize,
    /// Symmetric (`true`) or periodic (`false`).
    pub sym: bool,
}

impl Boxcar {
    /// Create a boxcar window description.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<F: Float> GetWindow<F> for Boxcar {
    fn get_window(&self) -> Vec<F> {
        vec![F::one(); self.m]
    }
}

/// Triangular window with non-zero end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Number of points.
    pub m: usize,
    /// Symmetric (`true`) or periodic (`false`).
    pub sym: bool,
}

impl Triangle {
    /// Create a triangular window description.
    pub fn new(m: usize, sym: bool) -> Self {
        Self { m, sym }
    }
}

impl<F: Float> GetWindow<F> for Triangle {
    fn get_window(&self) -> Vec<F> {
        if self.m <= 1 {
            return vec![F::one(); self.m];
        }
        let (m, needs_trunc) = extend(self.m, self.sym);
        let half: Vec<F> = (1..=(m + 1) / 2)
            .map(|n| {
                if m % 2 == 0 {
                    cast::<F>((2 * n - 1) as f64) / cast(m as f64)
                } else {
                    cast::<F>((2 * n) as f64) / cast((m + 1) as f64)
                }
            })
            .collect();
        let mirrored = if m % 2 == 0 {
            half.iter().rev()
        } else {
            half[..half.len() - 1].iter().rev()
        };
        let w = half.iter().chain(mirrored).copied().collect();
        truncate(w, needs_trunc)
    }
}

/// Generic weighted sum of cosine terms.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralCosine<F> {
    /// Number of points.
    pub m: usize,
    /// Cosine term weights.
    pub weights: Vec<F>,
    /// Symmetric (`true`) or periodic (`false`).
    pub sym: bool,
}

impl<F> GeneralCosine<F> {
    /// Create a general cosine window description.
    pub fn new(m: usize, weights: Vec<F>, sym: bool) -> Self {
        Self { m, weights, sym }
    }
}

impl<F: Float + FloatConst> GetWindow<F> for GeneralCosine<F> {
    fn get_window(&self) -> Vec<F> {
        general_cosine_impl(self.m, &self.weights, self.sym)
    }
}

/// Generalized Hamming window, `alpha - (1 - alpha) cos(2 pi n / (m - 1))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralHamming<F> {
    /// Number of points.
    pub m: usize,
    /// Window coefficient `alpha`.
    pub coefficient: F,
    /// Symmetric (`true`) or periodic (`false`).
    pub sym: bool,
}

impl<F> GeneralHamming<F> {
    /// Create a general Hamming window description.
    pub fn new(m: usize, coefficient: F, sym: bool) -> Self {
        Self {
            m,
            coefficient,
            sym,
        }
    }
}

impl<F: Float + FloatConst> GetWindow<F> for GeneralHamming<F> {
    fn get_window(&self) -> Vec<F> {
        let a = [self.coefficient, F::one() - self.coefficient];
        general_cosine_impl(self.m, &a, self.sym)
    }
}

macro_rules! cosine_window {
    ($(#[$doc:meta])* $name:ident, [$($a:expr),+]) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            /// Number of points.
            pub m: usize,
            /// Symmetric (`true`) or periodic (`false`).
            pub sym: bool,
        }

        impl $name {
            /// Create the window description.
            pub fn new(m: usize, sym: bool) -> Self {
                Self { m, sym }
            }
        }

        impl<F: Float + FloatConst> GetWindow<F> for $name {
            fn get_window(&self) -> Vec<F> {
                let a = [$(cast::<F>($a)),+];
                general_cosine_impl(self.m, &a, self.sym)
            }
        }
    };
}

cosine_window!(
    /// Hann window (raised cosine).
    Hann,
    [0.5, 0.5]
);
cosine_window!(
    /// Hamming window.
    Hamming,
    [0.54, 0.46]
);
cosine_window!(
    /// Blackman window.
    Blackman,
    [0.42, 0.50, 0.08]
);
cosine_window!(
    /// Minimum 4-term Blackman-Harris window according to Nuttall.
    Nuttall,
    [0.3635819, 0.4891775, 0.1365995, 0.0106411]
);

/// Kaiser window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kaiser<F> {
    /// Number of points.
    pub m: usize,
    /// Shape parameter.
    pub beta: F,
    /// Symmetric (`true`) or periodic (`false`).
    pub sym: bool,
}

impl<F> Kaiser<F> {
    /// Create a Kaiser window description.
    pub fn new(m: usize, beta: F, sym: bool) -> Self {
        Self { m, beta, sym }
    }
}

impl<F: Float + Bessel> GetWindow<F> for Kaiser<F> {
    fn get_window(&self) -> Vec<F> {
        if self.m <= 1 {
            return vec![F::one(); self.m];
        }
        let (m, needs_trunc) = extend(self.m, self.sym);
        let alpha = cast::<F>((m - 1) as f64) / cast(2.0);
        let denom = self.beta.i0();
        let w = (0..m)
            .map(|n| {
                let r = (cast::<F>(n as f64) - alpha) / alpha;
                (self.beta * (F::one() - r * r).sqrt()).i0() / denom
            })
            .collect();
        truncate(w, needs_trunc)
    }
}

/// Generalized Gaussian window, `exp(-0.5 |n / width|^(2p))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralGaussian<F> {
    /// Number of points.
    pub m: usize,
    /// Shape parameter; 1 is a Gaussian, 0.5 a Laplace shape.
    pub p: F,
    /// Standard deviation.
    pub width: F,
    /// Symmetric (`true`) or periodic (`false`).
    pub sym: bool,
}

impl<F> GeneralGaussian<F> {
    /// Create a general Gaussian window description.
    pub fn new(m: usize, p: F, width: F, sym: bool) -> Self {
        Self { m, p, width, sym }
    }
}

impl<F: Float> GetWindow<F> for GeneralGaussian<F> {
    fn get_window(&self) -> Vec<F> {
        if self.m <= 1 {
            return vec![F::one(); self.m];
        }
        let (m, needs_trunc) = extend(self.m, self.sym);
        let center = cast::<F>((m - 1) as f64) / cast(2.0);
        let two_p = self.p + self.p;
        let half = cast::<F>(0.5);
        let w = (0..m)
            .map(|n| {
                let x = (cast::<F>(n as f64) - center) / self.width;
                (-half * x.abs().powf(two_p)).exp()
            })
            .collect();
        truncate(w, needs_trunc)
    }
}

/// Borrowed window family and parameters, used by [`get_window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GetWindowBuilder<'a, F> {
    /// Boxcar window.
    Boxcar,
    /// Triangle window.
    Triangle,
    /// Hann window.
    Hann,
    /// Blackman window.
    Blackman,
    /// Hamming window.
    Hamming,
    /// Nuttall window.
    Nuttall,
    /// Kaiser window.
    Kaiser {
        /// Shape parameter `beta`.
        beta: F,
    },
    /// General cosine window.
    GeneralCosine {
        /// Coefficients for weighted cosine terms.
        weights: &'a [F],
    },
    /// General gaussian window.
    GeneralGaussian {
        /// Shape parameter.
        p: F,
        /// Width parameter.
        width: F,
    },
    /// General hamming window.
    GeneralHamming {
        /// Alpha coefficient.
        coefficient: F,
    },
}

/// A concrete window of a given length.
#[derive(Debug, Clone, PartialEq)]
pub enum Window<F> {
    /// See [`Boxcar`].
    Boxcar(Boxcar),
    /// See [`Triangle`].
    Triangle(Triangle),
    /// See [`Hann`].
    Hann(Hann),
    /// See [`Blackman`].
    Blackman(Blackman),
    /// See [`Hamming`].
    Hamming(Hamming),
    /// See [`Nuttall`].
    Nuttall(Nuttall),
    /// See [`Kaiser`].
    Kaiser(Kaiser<F>),
    /// See [`GeneralCosine`].
    GeneralCosine(GeneralCosine<F>),
    /// See [`GeneralGaussian`].
    GeneralGaussian(GeneralGaussian<F>),
    /// See [`GeneralHamming`].
    GeneralHamming(GeneralHamming<F>),
}

impl<F> GetWindow<F> for Window<F>
where
    F: Float + FloatConst + Bessel,
{
    fn get_window(&self) -> Vec<F> {
        match self {
            Window::Boxcar(w) => w.get_window(),
            Window::Triangle(w) => w.get_window(),
            Window::Hann(w) => w.get_window(),
            Window::Blackman(w) => w.get_window(),
            Window::Hamming(w) => w.get_window(),
            Window::Nuttall(w) => w.get_window(),
            Window::Kaiser(w) => w.get_window(),
            Window::GeneralCosine(w) => w.get_window(),
            Window::GeneralGaussian(w) => w.get_window(),
            Window::GeneralHamming(w) => w.get_window(),
        }
    }
}

/// Return a window of length `nx` for the given family.
///
/// `fftbins` defaults to `true`, giving a periodic window as
/// `scipy.signal.get_window` does; `Some(false)` gives the symmetric form.
pub fn get_window<F>(builder: GetWindowBuilder<'_, F>, nx: usize, fftbins: Option<bool>) -> Window<F>
where
    F: Float,
{
    let sym = !fftbins.unwrap_or(true);
    match builder {
        GetWindowBuilder::Boxcar => Window::Boxcar(Boxcar::new(nx, sym)),
        GetWindowBuilder::Triangle => Window::Triangle(Triangle::new(nx, sym)),
        GetWindowBuilder::Hann => Window::Hann(Hann::new(nx, sym)),
        GetWindowBuilder::Blackman => Window::Blackman(Blackman::new(nx, sym)),
        GetWindowBuilder::Hamming => Window::Hamming(Hamming::new(nx, sym)),
        GetWindowBuilder::Nuttall => Window::Nuttall(Nuttall::new(nx, sym)),
        GetWindowBuilder::Kaiser { beta } => Window::Kaiser(Kaiser::new(nx, beta, sym)),
        GetWindowBuilder::GeneralCosine { weights } => {
            Window::GeneralCosine(GeneralCosine::new(nx, weights.to_vec(), sym))
        }
        GetWindowBuilder::GeneralGaussian { p, width } => {
            Window::GeneralGaussian(GeneralGaussian::new(nx, p, width, sym))
        }
        GetWindowBuilder::GeneralHamming { coefficient } => {
            Window::GeneralHamming(GeneralHamming::new(nx, coefficient, sym))
        }
    }
}

impl<F: Float> FromStr for WindowBuilderOwned<F> {
    type Err = ConfigError;

    /// Parse a parameter-free window name, accepting the scipy aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boxcar" | "box" | "ones" | "rect" | "rectangular" => Ok(Self::Boxcar),
            "triang" | "triangle" | "tri" => Ok(Self::Triangle),
            "hann" | "han" => Ok(Self::Hann),
            "hamming" | "hamm" | "ham" => Ok(Self::Hamming),
            "blackman" | "black" | "blk" => Ok(Self::Blackman),
            "nuttall" | "nutl" | "nut" => Ok(Self::Nuttall),
            _ => Err(ConfigError::UnknownWindow { name: s.into() }),
        }
    }
}

/// Window weights of length `n` rescaled so that they sum to `n`.
///
/// Always uses the periodic form, as spectral estimators do.
pub fn normalized_weights<F>(builder: &WindowBuilderOwned<F>, n: usize) -> Vec<F>
where
    F: Float + FloatConst + Bessel,
{
    let mut w = builder.build_window(n, None).get_window();
    rescale_to_len(&mut w);
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        actual
            .iter()
            .zip(expected.iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));
    }

    #[test]
    fn hann_symmetric_matches_scipy() {
        // scipy.signal.windows.hann(5)
        let w: Vec<f64> = Hann::new(5, true).get_window();
        assert_close(&w, &[0.0, 0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn hann_periodic_matches_scipy() {
        // scipy.signal.get_window('hann', 4)
        let w: Vec<f64> = get_window::<f64>(GetWindowBuilder::Hann, 4, None).get_window();
        assert_close(&w, &[0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn hamming_end_points() {
        let w: Vec<f64> = Hamming::new(9, true).get_window();
        assert_abs_diff_eq!(w[0], 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[8], 0.08, epsilon = 1e-12);
    }

    #[test]
    fn blackman_symmetric_matches_scipy() {
        // scipy.signal.windows.blackman(5)
        let w: Vec<f64> = Blackman::new(5, true).get_window();
        assert_close(&w, &[0.0, 0.34, 1.0, 0.34, 0.0]);
    }

    #[test]
    fn triangle_even_and_odd() {
        // scipy.signal.windows.triang(4), triang(5)
        let even: Vec<f64> = Triangle::new(4, true).get_window();
        assert_close(&even, &[0.25, 0.75, 0.75, 0.25]);
        let odd: Vec<f64> = Triangle::new(5, true).get_window();
        assert_close(&odd, &[1.0 / 3.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 1.0 / 3.0]);
    }

    #[test]
    fn kaiser_zero_beta_is_boxcar() {
        let w: Vec<f64> = Kaiser::new(7, 0.0, true).get_window();
        assert_close(&w, &[1.0; 7]);
    }

    #[test]
    fn kaiser_is_symmetric_with_unit_peak() {
        let w: Vec<f64> = Kaiser::new(9, 8.6, true).get_window();
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-12);
        for i in 0..4 {
            assert_abs_diff_eq!(w[i], w[8 - i], epsilon = 1e-12);
        }
        assert_abs_diff_eq!(w[0], 1.0 / 8.6f64.i0(), epsilon = 1e-12);
    }

    #[test]
    fn general_gaussian_peak_and_symmetry() {
        let w: Vec<f64> = GeneralGaussian::new(7, 1.0, 2.0, true).get_window();
        assert_abs_diff_eq!(w[3], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[2], (-0.125f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(w[0], w[6], epsilon = 1e-12);
    }

    #[test]
    fn general_hamming_half_is_hann() {
        let a: Vec<f64> = GeneralHamming::new(11, 0.5, false).get_window();
        let b: Vec<f64> = Hann::new(11, false).get_window();
        assert_close(&a, &b);
    }

    #[test]
    fn degenerate_lengths() {
        let empty: Vec<f64> = Hann::new(0, true).get_window();
        assert!(empty.is_empty());
        let one: Vec<f64> = Nuttall::new(1, false).get_window();
        assert_close(&one, &[1.0]);
    }

    #[test]
    fn names_parse_with_scipy_aliases() {
        assert_eq!(
            "boxcar".parse::<WindowBuilderOwned<f64>>(),
            Ok(WindowBuilderOwned::Boxcar)
        );
        assert_eq!(
            "Hann".parse::<WindowBuilderOwned<f64>>(),
            Ok(WindowBuilderOwned::Hann)
        );
        assert_eq!(
            "triang".parse::<WindowBuilderOwned<f64>>(),
            Ok(WindowBuilderOwned::Triangle)
        );
        assert_eq!(
            "flattop".parse::<WindowBuilderOwned<f64>>(),
            Err(ConfigError::UnknownWindow {
                name: "flattop".into()
            })
        );
    }

    #[test]
    fn normalized_weights_sum_to_length() {
        for builder in [
            WindowBuilderOwned::Boxcar,
            WindowBuilderOwned::Hann,
            WindowBuilderOwned::Hamming,
            WindowBuilderOwned::Kaiser { beta: 6.0 },
        ] {
            let w: Vec<f64> = normalized_weights(&builder, 10);
            assert_eq!(w.len(), 10);
            assert_abs_diff_eq!(w.iter().sum::<f64>(), 10.0, epsilon = 1e-10);
        }
        let boxcar: Vec<f64> = normalized_weights(&WindowBuilderOwned::Boxcar, 5);
        assert_close(&boxcar, &[1.0; 5]);
    }
}
