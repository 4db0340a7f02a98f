//! Surface geostrophic velocity from gridded sea level anomaly (SLA).
//!
//! Velocities come from centred differences of SLA around the grid cell
//! nearest a point of interest:
//! `u = -(g/f) dη/dy`, `v = (g/f) dη/dx`.

use crate::kernel::{ExecInvariantViolation, Read1D};
use crate::oceans::coriolis_parameter;
use itertools::Itertools;
use ndarray::ArrayView2;

/// Gravitational acceleration (m s⁻²).
const G: f64 = 9.8;
/// Metres per degree of latitude.
const M_PER_DEG_LAT: f64 = 111.32e3;
/// Metres per degree of longitude at the equator.
const M_PER_DEG_LON: f64 = 111e3;

/// Index of the grid value closest to `value`; ties resolve to the first.
/// `None` for an empty grid.
pub fn nearest_index(grid: &[f64], value: f64) -> Option<usize> {
    grid.iter()
        .map(|g| (g - value).abs())
        .position_min_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal))
}

/// SLA at the four neighbours of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlaStencil {
    /// Neighbour at the next longitude.
    pub east: f64,
    /// Neighbour at the previous longitude.
    pub west: f64,
    /// Neighbour at the next latitude.
    pub north: f64,
    /// Neighbour at the previous latitude.
    pub south: f64,
}

/// Distances spanned by a centred difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing {
    /// Zonal distance (m).
    pub dx: f64,
    /// Meridional distance (m).
    pub dy: f64,
}

impl GridSpacing {
    /// Spacing for a centred difference at latitude `lat` spanning `dlat`
    /// and `dlon` degrees.
    pub fn from_centered(lat: f64, dlat: f64, dlon: f64) -> Self {
        Self {
            dx: dlon * M_PER_DEG_LON * lat.to_radians().cos(),
            dy: dlat * M_PER_DEG_LAT,
        }
    }
}

/// Geostrophic `(u, v)` in m/s from an SLA stencil in metres, with `f` the
/// Coriolis parameter.
pub fn geostrophic_velocity(stencil: &SlaStencil, spacing: &GridSpacing, f: f64) -> (f64, f64) {
    let u = -(G / f) * (stencil.north - stencil.south) / spacing.dy;
    let v = (G / f) * (stencil.east - stencil.west) / spacing.dx;
    (u, v)
}

/// SLA and geostrophic velocity at the grid cell nearest a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeostrophicPoint {
    /// Latitude of the selected cell.
    pub lat: f64,
    /// Longitude of the selected cell.
    pub lon: f64,
    /// SLA at the cell.
    pub sla: f64,
    /// Eastward velocity.
    pub u: f64,
    /// Northward velocity.
    pub v: f64,
}

/// Geostrophic velocity at the cell of `sla` nearest `(lat, lon)`.
///
/// `sla` is indexed `[lon, lat]`. The selected cell needs a neighbour on
/// every side; cells on the grid edge are rejected.
pub fn geostrophic_at<ILat, ILon>(
    lat_grid: &ILat,
    lon_grid: &ILon,
    sla: ArrayView2<'_, f64>,
    lat: f64,
    lon: f64,
) -> Result<GeostrophicPoint, ExecInvariantViolation>
where
    ILat: Read1D<f64> + ?Sized,
    ILon: Read1D<f64> + ?Sized,
{
    let lats = lat_grid.read_slice().map_err(ExecInvariantViolation::from)?;
    let lons = lon_grid.read_slice().map_err(ExecInvariantViolation::from)?;
    if sla.dim() != (lons.len(), lats.len()) {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "sla must have shape (lon, lat)",
        });
    }

    let edge = ExecInvariantViolation::InvalidState {
        reason: "nearest grid cell lies on the grid edge",
    };
    let ii = nearest_index(lats, lat).ok_or(edge.clone())?;
    let jj = nearest_index(lons, lon).ok_or(edge.clone())?;
    if ii == 0 || jj == 0 || ii + 1 >= lats.len() || jj + 1 >= lons.len() {
        return Err(edge);
    }

    let lat_cell = lats[ii];
    let spacing = GridSpacing::from_centered(
        lat_cell,
        lats[ii + 1] - lats[ii - 1],
        lons[jj + 1] - lons[jj - 1],
    );
    let stencil = SlaStencil {
        east: sla[[jj + 1, ii]],
        west: sla[[jj - 1, ii]],
        north: sla[[jj, ii + 1]],
        south: sla[[jj, ii - 1]],
    };
    let (u, v) = geostrophic_velocity(&stencil, &spacing, coriolis_parameter(lat_cell));
    log::debug!("geostrophic_at: cell ({lat_cell}, {}) u={u} v={v}", lons[jj]);

    Ok(GeostrophicPoint {
        lat: lat_cell,
        lon: lons[jj],
        sla: sla[[jj, ii]],
        u,
        v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn nearest_index_prefers_first_tie() {
        let grid = [10.0, 10.25, 10.5, 10.75];
        assert_eq!(nearest_index(&grid, 10.4), Some(2));
        assert_eq!(nearest_index(&grid, 10.125), Some(0));
        assert_eq!(nearest_index(&grid, -5.0), Some(0));
        assert_eq!(nearest_index(&[], 1.0), None);
    }

    #[test]
    fn spacing_shrinks_with_latitude() {
        let s = GridSpacing::from_centered(60.0, 0.5, 0.5);
        assert_relative_eq!(s.dy, 55_660.0, max_relative = 1e-12);
        assert_relative_eq!(s.dx, 27_750.0, max_relative = 1e-12);
    }

    #[test]
    fn velocity_follows_geostrophic_balance() {
        let spacing = GridSpacing { dx: 1e4, dy: 2e4 };
        let stencil = SlaStencil {
            east: 0.02,
            west: 0.0,
            north: 0.01,
            south: 0.03,
        };
        let (u, v) = geostrophic_velocity(&stencil, &spacing, 1e-4);
        assert_relative_eq!(u, 0.098, max_relative = 1e-12);
        assert_relative_eq!(v, 0.196, max_relative = 1e-12);

        let (u_south, _) = geostrophic_velocity(&stencil, &spacing, -1e-4);
        assert_relative_eq!(u_south, -u, max_relative = 1e-12);
    }

    #[test]
    fn planar_sla_gives_uniform_velocity() {
        let lats: Vec<f64> = (0..5).map(|i| 30.0 + 0.25 * i as f64).collect();
        let lons: Vec<f64> = (0..6).map(|j| -125.0 + 0.25 * j as f64).collect();
        let (a, c) = (0.04, -0.02);
        let sla = Array2::from_shape_fn((lons.len(), lats.len()), |(j, i)| {
            a * lats[i] + c * lons[j]
        });

        let out = geostrophic_at(&lats, &lons, sla.view(), 30.6, -124.3).expect("interior cell");
        assert_eq!((out.lat, out.lon), (30.5, -124.25));
        let f = coriolis_parameter(30.5);
        assert_relative_eq!(out.u, -(9.8 / f) * a / 111.32e3, max_relative = 1e-9);
        assert_relative_eq!(
            out.v,
            (9.8 / f) * c / (111e3 * 30.5f64.to_radians().cos()),
            max_relative = 1e-9
        );
    }

    #[test]
    fn edge_cells_and_bad_shapes_are_rejected() {
        let lats = [0.0, 1.0, 2.0];
        let lons = [0.0, 1.0, 2.0];
        let sla = Array2::<f64>::zeros((3, 3));
        let err = geostrophic_at(&lats[..], &lons[..], sla.view(), 0.1, 1.0).expect_err("edge cell");
        assert!(matches!(err, ExecInvariantViolation::InvalidState { .. }));

        let sla = Array2::<f64>::zeros((2, 3));
        let err = geostrophic_at(&lats[..], &lons[..], sla.view(), 1.0, 1.0).expect_err("bad shape");
        assert!(matches!(err, ExecInvariantViolation::InvalidState { .. }));
    }
}
