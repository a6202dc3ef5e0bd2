//! Cylindrical projections: plate carrée, Mercator, Miller, Lambert cylindrical
//! equal-area and the rotated-pole latitude/longitude grids.

use std::f64::consts::PI;

use crate::transform::{delta_lon, wrap_degrees, MapProjection, EARTH_RADIUS};

/// The vertical stretch applied to latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CylinderKind {
    /// y = φ
    Equirectangular,
    /// y = ln tan(π/4 + φ/2), clipped to a latitude band.
    Mercator { min_lat: f64, max_lat: f64 },
    /// y = 1.25 ln tan(π/4 + 0.4 φ)
    Miller,
    /// y = sin φ
    EqualArea,
}

/// A normal-aspect cylindrical projection.
#[derive(Debug, Clone)]
pub struct Cylindrical {
    pub kind: CylinderKind,
    /// Central meridian in degrees
    pub lon0: f64,
}

impl Cylindrical {
    pub fn plate_carree() -> Self {
        Self {
            kind: CylinderKind::Equirectangular,
            lon0: 0.0,
        }
    }

    /// Mercator limited to [-80, 84] like the usual world maps.
    pub fn mercator() -> Self {
        Self {
            kind: CylinderKind::Mercator {
                min_lat: -80.0,
                max_lat: 84.0,
            },
            lon0: 0.0,
        }
    }

    pub fn miller() -> Self {
        Self {
            kind: CylinderKind::Miller,
            lon0: 0.0,
        }
    }

    pub fn lambert_cylindrical() -> Self {
        Self {
            kind: CylinderKind::EqualArea,
            lon0: 0.0,
        }
    }
}

impl MapProjection for Cylindrical {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let phi = lat.to_radians();
        let x = EARTH_RADIUS * delta_lon(lon, self.lon0);
        let y = match self.kind {
            CylinderKind::Equirectangular => phi,
            CylinderKind::Mercator { min_lat, max_lat } => {
                if lat < min_lat || lat > max_lat {
                    return None;
                }
                (PI / 4.0 + phi / 2.0).tan().ln()
            }
            CylinderKind::Miller => 1.25 * (PI / 4.0 + 0.4 * phi).tan().ln(),
            CylinderKind::EqualArea => phi.sin(),
        };
        Some((x, EARTH_RADIUS * y))
    }

    fn central_longitude(&self) -> f64 {
        self.lon0
    }
}

/// Latitude/longitude on a sphere whose north pole has been moved, drawn as an
/// equirectangular map of the rotated coordinates.
#[derive(Debug, Clone)]
pub struct RotatedPole {
    /// Geographic longitude of the rotated north pole (degrees)
    pub pole_lon: f64,
    /// Geographic latitude of the rotated north pole (degrees)
    pub pole_lat: f64,
    /// Longitude added in the rotated frame (degrees)
    pub central_rotated_lon: f64,
}

impl Default for RotatedPole {
    fn default() -> Self {
        Self {
            pole_lon: 0.0,
            pole_lat: 90.0,
            central_rotated_lon: 0.0,
        }
    }
}

impl RotatedPole {
    pub fn new(pole_lon: f64, pole_lat: f64) -> Self {
        Self {
            pole_lon,
            pole_lat,
            central_rotated_lon: 0.0,
        }
    }

    /// Geographic to rotated coordinates, both in degrees.
    pub fn rotate(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let dlon = (lon - self.pole_lon).to_radians();
        let phi_p = self.pole_lat.to_radians();

        let x = phi.cos() * dlon.cos();
        let y = phi.cos() * dlon.sin();
        let z = phi.sin();

        // Tilt about the y axis so the pole lands on +z.
        let xr = x * phi_p.sin() - z * phi_p.cos();
        let zr = x * phi_p.cos() + z * phi_p.sin();

        let rot_lat = zr.clamp(-1.0, 1.0).asin().to_degrees();
        let rot_lon = wrap_degrees(y.atan2(xr).to_degrees() + self.central_rotated_lon);
        (rot_lon, rot_lat)
    }
}

impl MapProjection for RotatedPole {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let (rot_lon, rot_lat) = self.rotate(lon, lat);
        Some((
            EARTH_RADIUS * rot_lon.to_radians(),
            EARTH_RADIUS * rot_lat.to_radians(),
        ))
    }

    fn breaks_between(&self, a: (f64, f64), b: (f64, f64)) -> bool {
        let (ra, _) = self.rotate(a.0, a.1);
        let (rb, _) = self.rotate(b.0, b.1);
        (ra - rb).abs() > 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_carree_is_linear() {
        let proj = Cylindrical::plate_carree();
        let (x, y) = proj.forward(90.0, 45.0).unwrap();
        assert!((x - EARTH_RADIUS * PI / 2.0).abs() < 1e-6);
        assert!((y - EARTH_RADIUS * PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_mercator_rejects_poles() {
        let proj = Cylindrical::mercator();
        assert!(proj.forward(0.0, 89.0).is_none());
        assert!(proj.forward(0.0, -85.0).is_none());
        let (_, y) = proj.forward(0.0, 0.0).unwrap();
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_miller_is_below_mercator_at_high_latitude() {
        let (_, y_merc) = Cylindrical::mercator().forward(0.0, 70.0).unwrap();
        let (_, y_mill) = Cylindrical::miller().forward(0.0, 70.0).unwrap();
        assert!(y_mill < y_merc);
    }

    #[test]
    fn test_default_rotated_pole_is_identity() {
        let rot = RotatedPole::default();
        let (lon, lat) = rot.rotate(25.0, 60.0);
        assert!((lon - 25.0).abs() < 1e-9);
        assert!((lat - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_pole_maps_pole_to_north() {
        let rot = RotatedPole::new(-170.0, 40.0);
        let (_, lat) = rot.rotate(-170.0, 40.0);
        assert!((lat - 90.0).abs() < 1e-6);
    }
}
