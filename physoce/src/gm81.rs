//! Garrett-Munk empirical spectrum of internal waves, in the form given by
//! Munk (1981), "Internal waves and small-scale processes", chapter 9 of
//! *Evolution of Physical Oceanography*.
//!
//! Symbols follow Munk: `f` Coriolis frequency, `N` local and `N0`
//! surface-extrapolated buoyancy frequency, `b` e-folding depth of the
//! stratification, `j` vertical mode number, `k` horizontal wavenumber and
//! `omg` frequency. All frequencies are radian.
//!
//! ```
//! use physoce::gm81::{GarrettMunk, GarrettMunkConfig};
//! use physoce::kernel::KernelLifecycle;
//!
//! let gm = GarrettMunk::try_new(GarrettMunkConfig::new(1e-4, 5e-3, 5.2e-3, 1300.0)).unwrap();
//! let omg = gm.frequency(1e-3, 2.0);
//! assert!((gm.wavenumber(omg, 2.0) - 1e-3).abs() < 1e-12);
//! ```

use core::f64::consts::PI;

use crate::kernel::{check_len, require_positive, ConfigError, ExecInvariantViolation, KernelLifecycle};
use ndarray::{Array1, ArrayView1};

/// Energy level of the spectrum.
pub const ENERGY: f64 = 6.3e-5;
/// Mode-scale number `j*`.
pub const J_STAR: f64 = 3.0;
/// Gravitational acceleration (m s⁻²).
const G: f64 = 9.81;

/// Constructor config for [`GarrettMunk`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GarrettMunkConfig {
    /// Coriolis frequency (rad/s).
    pub f: f64,
    /// Local buoyancy frequency (rad/s).
    pub n: f64,
    /// Surface-extrapolated buoyancy frequency (rad/s).
    pub n0: f64,
    /// Stratification e-folding scale (m).
    pub b: f64,
    /// Dimensionless energy level. Default [`ENERGY`].
    pub energy: f64,
    /// Mode-scale number. Default [`J_STAR`].
    pub j_star: f64,
}

impl GarrettMunkConfig {
    /// Config with the canonical energy level and mode scale.
    pub fn new(f: f64, n: f64, n0: f64, b: f64) -> Self {
        Self {
            f,
            n,
            n0,
            b,
            energy: ENERGY,
            j_star: J_STAR,
        }
    }
}

/// GM81 spectrum for one set of environmental parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GarrettMunk {
    f: f64,
    n: f64,
    n0: f64,
    b: f64,
    energy: f64,
    j_star: f64,
    jsum: f64,
}

impl KernelLifecycle for GarrettMunk {
    type Config = GarrettMunkConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        require_positive("f", config.f)?;
        require_positive("n", config.n)?;
        require_positive("n0", config.n0)?;
        require_positive("b", config.b)?;
        require_positive("energy", config.energy)?;
        require_positive("j_star", config.j_star)?;
        let js = config.j_star;
        Ok(Self {
            f: config.f,
            n: config.n,
            n0: config.n0,
            b: config.b,
            energy: config.energy,
            j_star: js,
            // sum_{j>=1} 1 / (j^2 + j*^2)
            jsum: (PI * js / (PI * js).tanh() - 1.0) / (2.0 * js * js),
        })
    }
}

impl GarrettMunk {
    fn vertical_wavenumber(&self, j: f64) -> f64 {
        PI * j / self.b
    }

    /// Frequency as a function of horizontal wavenumber and mode number.
    pub fn frequency(&self, k: f64, j: f64) -> f64 {
        let m2 = self.vertical_wavenumber(j).powi(2);
        ((self.n0.powi(2) * k * k + self.f.powi(2) * m2) / (k * k + m2)).sqrt()
    }

    /// Horizontal wavenumber as a function of frequency and mode number.
    pub fn wavenumber(&self, omg: f64, j: f64) -> f64 {
        ((omg * omg - self.f.powi(2)) / (self.n0.powi(2) - omg * omg)).sqrt()
            * self.vertical_wavenumber(j)
    }

    /// Munk's `B(omg)`, the frequency distribution.
    pub fn frequency_distribution(&self, omg: f64) -> f64 {
        2.0 / PI * self.f / omg / (omg * omg - self.f.powi(2)).sqrt()
    }

    /// Munk's `H(j)`, the mode distribution. Sums to one over `j >= 1`.
    pub fn mode_distribution(&self, j: f64) -> f64 {
        1.0 / (j * j + self.j_star.powi(2)) / self.jsum
    }

    /// Munk's `E(omg, j)`.
    pub fn energy_omg_j(&self, omg: f64, j: f64) -> f64 {
        self.frequency_distribution(omg) * self.mode_distribution(j) * self.energy
    }

    /// `E(omg, j)` mapped to horizontal wavenumber through the dispersion
    /// relation, `E(k, j) = E(omg, j) domg/dk`.
    pub fn energy_k_j(&self, k: f64, j: f64) -> f64 {
        let omg = self.frequency(k, j);
        let domg_dk = (self.n0.powi(2) - omg * omg) / omg * k
            / (k * k + self.vertical_wavenumber(j).powi(2));
        self.energy_omg_j(omg, j) * domg_dk
    }

    fn potential_factor(&self, omg: f64) -> f64 {
        self.b.powi(2) * self.n0 * self.n * (omg * omg - self.f.powi(2)) / (omg * omg)
    }

    fn kinetic_factor(&self, omg: f64) -> f64 {
        self.b.powi(2) * self.n0 * self.n * (omg * omg + self.f.powi(2)) / (omg * omg)
    }

    // Ratio of sea-surface height variance to kinetic energy for a mode.
    fn ssh_factor(&self, omg: f64, k: f64) -> f64 {
        let f2 = self.f.powi(2);
        (omg * omg - f2).powi(2) / (f2 * (omg * omg + f2)) / (k * k) * f2 / (G * G)
    }

    /// Potential energy spectrum (N² times displacement) in `(k, j)`.
    pub fn potential_energy_k_j(&self, k: f64, j: f64) -> f64 {
        self.potential_factor(self.frequency(k, j)) * self.energy_k_j(k, j)
    }

    /// Kinetic energy spectrum in `(k, j)`.
    pub fn kinetic_energy_k_j(&self, k: f64, j: f64) -> f64 {
        self.kinetic_factor(self.frequency(k, j)) * self.energy_k_j(k, j)
    }

    /// Sea-surface height spectrum in `(k, j)`.
    pub fn ssh_k_j(&self, k: f64, j: f64) -> f64 {
        self.ssh_factor(self.frequency(k, j), k) * self.kinetic_energy_k_j(k, j)
    }

    /// Potential energy spectrum (N² times displacement) in `(omg, j)`.
    pub fn potential_energy_omg_j(&self, omg: f64, j: f64) -> f64 {
        self.potential_factor(omg) * self.energy_omg_j(omg, j)
    }

    /// Kinetic energy spectrum in `(omg, j)`.
    pub fn kinetic_energy_omg_j(&self, omg: f64, j: f64) -> f64 {
        self.kinetic_factor(omg) * self.energy_omg_j(omg, j)
    }

    /// Sea-surface height spectrum in `(omg, j)`.
    pub fn ssh_omg_j(&self, omg: f64, j: f64) -> f64 {
        self.ssh_factor(omg, self.wavenumber(omg, j)) * self.kinetic_energy_omg_j(omg, j)
    }
}

/// Integral of `s(kh) / sqrt(kh² - k²)` over the grid `kh`, with
/// `k = kh[0]`.
///
/// `s` is taken as piecewise linear between grid points and each segment is
/// integrated exactly, so the square-root singularity at `kh = k` is handled
/// without special treatment. Fewer than two points integrate to zero.
pub fn sqrt_trapz(kh: ArrayView1<'_, f64>, s: ArrayView1<'_, f64>) -> f64 {
    if kh.len() < 2 {
        return 0.0;
    }
    let k = kh[0];
    let root = |x: f64| (x * x - k * k).sqrt();
    kh.windows(2)
        .into_iter()
        .zip(s.windows(2))
        .map(|(x, y)| {
            let (a, b) = (x[0], x[1]);
            let (sa, sb) = (y[0], y[1]);
            ((sa - sb) * (root(a) - root(b))
                + (a * sb - b * sa) * ((a + root(a)) / (b + root(b))).ln())
                / (b - a)
        })
        .sum()
}

/// One-dimensional wavenumber spectrum from an isotropic two-dimensional
/// spectrum `s` on the increasing grid `k`:
/// `S1d(k) = 2/π ∫_k^∞ S2d(kh) / sqrt(kh² - k²) dkh`.
///
/// The normalization preserves the total variance. The last entry is zero.
pub fn calc_1d(
    k: ArrayView1<'_, f64>,
    s: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, ExecInvariantViolation> {
    check_len("s", k.len(), s.len())?;
    Ok((0..k.len())
        .map(|i| 2.0 / PI * sqrt_trapz(k.slice(ndarray::s![i..]), s.slice(ndarray::s![i..])))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    fn gm() -> GarrettMunk {
        GarrettMunk::try_new(GarrettMunkConfig::new(1e-4, 5e-3, 5.2e-3, 1300.0))
            .expect("valid parameters")
    }

    #[test]
    fn mode_distribution_is_normalized() {
        let gm = gm();
        assert_relative_eq!(gm.jsum, 0.46804322686252536, max_relative = 1e-14);
        let total: f64 = (1..200_000).map(|j| gm.mode_distribution(j as f64)).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 2e-5);
        assert_relative_eq!(gm.mode_distribution(1.0), 0.21365547936744786, max_relative = 1e-12);
    }

    #[test]
    fn dispersion_relation_round_trips() {
        let gm = gm();
        let omg = gm.frequency(1e-3, 2.0);
        assert_relative_eq!(omg, 0.001058114094435265, max_relative = 1e-12);
        assert_relative_eq!(gm.wavenumber(omg, 2.0), 1e-3, max_relative = 1e-12);
    }

    #[test]
    fn frequency_space_spectra() {
        let gm = gm();
        assert_relative_eq!(gm.frequency_distribution(3e-4), 750.2635967975884, max_relative = 1e-12);
        assert_relative_eq!(gm.energy_omg_j(3e-4, 1.0), 0.010098769490821266, max_relative = 1e-12);
        assert_relative_eq!(gm.potential_energy_omg_j(3e-4, 1.0), 0.39443549460149907, max_relative = 1e-12);
        assert_relative_eq!(gm.kinetic_energy_omg_j(3e-4, 1.0), 0.49304436825187375, max_relative = 1e-12);
        assert_relative_eq!(gm.ssh_omg_j(3e-4, 1.0), 0.01891401388243607, max_relative = 1e-10);
    }

    #[test]
    fn wavenumber_space_spectra() {
        let gm = gm();
        assert_relative_eq!(gm.energy_k_j(1e-3, 2.0), 0.000594711322474933, max_relative = 1e-12);
        assert_relative_eq!(gm.potential_energy_k_j(1e-3, 2.0), 0.025898215289706438, max_relative = 1e-12);
        assert_relative_eq!(gm.kinetic_energy_k_j(1e-3, 2.0), 0.02636501572939067, max_relative = 1e-12);
        assert_relative_eq!(gm.ssh_k_j(1e-3, 2.0), 0.00029860728448032905, max_relative = 1e-10);
    }

    #[test]
    fn sqrt_trapz_is_exact_for_constant_spectrum() {
        let kh = array![1.0, 2.0, 3.0, 4.0];
        let s = array![1.0, 1.0, 1.0, 1.0];
        assert_relative_eq!(sqrt_trapz(kh.view(), s.view()), 4.0f64.acosh(), max_relative = 1e-12);
        assert_eq!(sqrt_trapz(kh.slice(ndarray::s![3..]), s.slice(ndarray::s![3..])), 0.0);
    }

    #[test]
    fn calc_1d_integrates_tail() {
        let k = array![1.0, 2.0, 3.0, 4.0];
        let s = array![4.0, 3.0, 2.0, 1.0];
        let s1d = calc_1d(k.view(), s.view()).expect("matching lengths");
        let expected = [4.102506409229607, 1.986691601102659, 0.8473892969758263, 0.0];
        for (a, b) in s1d.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }

        let err = calc_1d(k.view(), s.slice(ndarray::s![..3])).expect_err("length mismatch");
        assert!(matches!(err, ExecInvariantViolation::LengthMismatch { arg: "s", .. }));
    }

    #[test]
    fn config_rejects_non_positive_parameters() {
        let err = GarrettMunk::try_new(GarrettMunkConfig::new(0.0, 5e-3, 5.2e-3, 1300.0))
            .expect_err("f must be positive");
        assert!(matches!(err, ConfigError::InvalidArgument { arg: "f", .. }));
    }
}
