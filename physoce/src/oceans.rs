//! Basic physical-oceanography formulas.

use crate::kernel::{check_len, require_positive, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D};
use crate::Error;

/// Earth rotation rate used for `beta` (s⁻¹).
const OMEGA_BETA: f64 = 7.2921e-5;
/// Earth rotation rate used for `f`, the TEOS-10 value (s⁻¹).
const OMEGA: f64 = 7.292115e-5;
/// Mean Earth radius (m).
const EARTH_RADIUS: f64 = 6.371e6;
/// Von Karman's constant.
const KAPPA: f64 = 0.41;

/// Meridional gradient of the Coriolis frequency, `beta = df/dy`, in
/// m⁻¹ s⁻¹, at latitude `lat` in degrees.
pub fn coriolis_beta(lat: f64) -> f64 {
    2.0 * OMEGA_BETA * lat.to_radians().cos() / EARTH_RADIUS
}

/// Coriolis parameter `f = 2 Ω sin(lat)` in s⁻¹, at latitude `lat` in
/// degrees.
pub fn coriolis_parameter(lat: f64) -> f64 {
    2.0 * OMEGA * lat.to_radians().sin()
}

/// Constructor config for [`BottomStress`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomStressConfig {
    /// Bottom roughness length (m). Default 1e-3.
    pub z0: f64,
    /// Seawater density (kg m⁻³). Default 1025.
    pub rho: f64,
}

impl Default for BottomStressConfig {
    fn default() -> Self {
        Self {
            z0: 1e-3,
            rho: 1025.0,
        }
    }
}

/// Bottom stress from a logarithmic boundary layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomStress {
    z0: f64,
    rho: f64,
}

impl KernelLifecycle for BottomStress {
    type Config = BottomStressConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        require_positive("z0", config.z0)?;
        require_positive("rho", config.rho)?;
        Ok(Self {
            z0: config.z0,
            rho: config.rho,
        })
    }
}

impl BottomStress {
    /// Stress `(taux, tauy)` in N m⁻² for near-bottom velocity `(u, v)` in
    /// m/s measured `z` metres above the bed.
    ///
    /// The stress opposes the flow.
    pub fn stress(&self, u: f64, v: f64, z: f64) -> (f64, f64) {
        let speed = u.hypot(v);
        let theta = v.atan2(u);
        let ustar = speed / ((z / self.z0).ln() / KAPPA);
        let tau = self.rho * ustar * ustar;
        (-tau * theta.cos(), -tau * theta.sin())
    }

    /// [`Self::stress`] over paired velocity series at a common height.
    pub fn stress_series<IU, IV>(
        &self,
        u: &IU,
        v: &IV,
        z: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), ExecInvariantViolation>
    where
        IU: Read1D<f64> + ?Sized,
        IV: Read1D<f64> + ?Sized,
    {
        let u = u.read_slice().map_err(ExecInvariantViolation::from)?;
        let v = v.read_slice().map_err(ExecInvariantViolation::from)?;
        check_len("v", u.len(), v.len())?;
        Ok(u.iter()
            .zip(v.iter())
            .map(|(&ui, &vi)| self.stress(ui, vi, z))
            .unzip())
    }
}

/// Bottom stress series with the default roughness and density.
pub fn bottom_stress_series(u: &[f64], v: &[f64], z: f64) -> Result<(Vec<f64>, Vec<f64>), Error> {
    let kernel = BottomStress::try_new(BottomStressConfig::default())?;
    Ok(kernel.stress_series(u, v, z)?)
}
