//! Azimuthal projections centred on a point of the sphere.
//!
//! All of them share the same geometry: a point at angular distance `c` from
//! the centre is placed along its azimuth at a radius `R k(c) sin c`, where
//! the scale function `k` distinguishes the projections.

use crate::transform::{delta_lon, MapProjection, EARTH_RADIUS};

/// Default satellite altitude (meters) of the nearside perspective view.
pub const DEFAULT_SATELLITE_HEIGHT: f64 = 35785831.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AzimuthalKind {
    Orthographic,
    /// Perspective from a finite altitude above the centre.
    NearsidePerspective { height: f64 },
    Gnomonic,
    Stereographic,
    AzimuthalEquidistant,
    LambertAzimuthalEqualArea,
}

/// An azimuthal projection with its centre and the largest angular distance
/// it will draw.
#[derive(Debug, Clone)]
pub struct Azimuthal {
    pub kind: AzimuthalKind,
    /// Centre longitude in degrees
    pub lon0: f64,
    /// Centre latitude in degrees
    pub lat0: f64,
    /// Largest angular distance from the centre that is drawn (degrees)
    pub max_angle: f64,
}

impl Azimuthal {
    pub fn new(kind: AzimuthalKind, lon0: f64, lat0: f64) -> Self {
        let max_angle = match kind {
            AzimuthalKind::Orthographic => 90.0,
            AzimuthalKind::NearsidePerspective { height } => {
                (EARTH_RADIUS / (EARTH_RADIUS + height)).acos().to_degrees()
            }
            AzimuthalKind::Gnomonic => 80.0,
            AzimuthalKind::Stereographic => 150.0,
            AzimuthalKind::AzimuthalEquidistant | AzimuthalKind::LambertAzimuthalEqualArea => {
                179.5
            }
        };
        Self {
            kind,
            lon0,
            lat0,
            max_angle,
        }
    }

    pub fn orthographic() -> Self {
        Self::new(AzimuthalKind::Orthographic, 0.0, 0.0)
    }

    pub fn nearside_perspective() -> Self {
        Self::new(
            AzimuthalKind::NearsidePerspective {
                height: DEFAULT_SATELLITE_HEIGHT,
            },
            0.0,
            0.0,
        )
    }

    pub fn gnomonic() -> Self {
        Self::new(AzimuthalKind::Gnomonic, 0.0, 0.0)
    }

    pub fn stereographic() -> Self {
        Self::new(AzimuthalKind::Stereographic, 0.0, 0.0)
    }

    /// Stereographic centred on the north pole, drawn down to the equator.
    pub fn north_polar_stereo() -> Self {
        Self {
            max_angle: 90.0,
            ..Self::new(AzimuthalKind::Stereographic, 0.0, 90.0)
        }
    }

    /// Stereographic centred on the south pole, drawn up to the equator.
    pub fn south_polar_stereo() -> Self {
        Self {
            max_angle: 90.0,
            ..Self::new(AzimuthalKind::Stereographic, 0.0, -90.0)
        }
    }

    pub fn azimuthal_equidistant() -> Self {
        Self::new(AzimuthalKind::AzimuthalEquidistant, 0.0, 0.0)
    }

    pub fn lambert_azimuthal_equal_area() -> Self {
        Self::new(AzimuthalKind::LambertAzimuthalEqualArea, 0.0, 0.0)
    }

    /// Scale factor k(c) given cos c.
    fn scale(&self, cos_c: f64) -> f64 {
        match self.kind {
            AzimuthalKind::Orthographic => 1.0,
            AzimuthalKind::NearsidePerspective { height } => {
                let p = 1.0 + height / EARTH_RADIUS;
                (p - 1.0) / (p - cos_c)
            }
            AzimuthalKind::Gnomonic => 1.0 / cos_c,
            AzimuthalKind::Stereographic => 2.0 / (1.0 + cos_c),
            AzimuthalKind::AzimuthalEquidistant => {
                let c = cos_c.clamp(-1.0, 1.0).acos();
                if c < 1e-12 {
                    1.0
                } else {
                    c / c.sin()
                }
            }
            AzimuthalKind::LambertAzimuthalEqualArea => (2.0 / (1.0 + cos_c)).sqrt(),
        }
    }
}

impl MapProjection for Azimuthal {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let phi = lat.to_radians();
        let phi0 = self.lat0.to_radians();
        let dlon = delta_lon(lon, self.lon0);

        let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * dlon.cos();
        if cos_c < self.max_angle.to_radians().cos() {
            return None;
        }

        let k = self.scale(cos_c);
        let x = EARTH_RADIUS * k * phi.cos() * dlon.sin();
        let y = EARTH_RADIUS * k * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * dlon.cos());
        Some((x, y))
    }

    fn central_longitude(&self) -> f64 {
        self.lon0
    }

    // Only the antipode is singular, and it is never drawn.
    fn breaks_between(&self, _a: (f64, f64), _b: (f64, f64)) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthographic_hides_far_side() {
        let proj = Azimuthal::orthographic();
        assert!(proj.forward(0.0, 0.0).is_some());
        assert!(proj.forward(170.0, 0.0).is_none());
    }

    #[test]
    fn test_orthographic_limb_radius() {
        let (x, y) = Azimuthal::orthographic().forward(90.0, 0.0).unwrap();
        assert!((x - EARTH_RADIUS).abs() < 1e-3);
        assert!(y.abs() < 1e-3);
    }

    #[test]
    fn test_north_polar_stereo_pole_at_origin() {
        let (x, y) = Azimuthal::north_polar_stereo().forward(45.0, 90.0).unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
        assert!(Azimuthal::north_polar_stereo().forward(0.0, -10.0).is_none());
    }

    #[test]
    fn test_south_polar_stereo_hides_north() {
        assert!(Azimuthal::south_polar_stereo().forward(0.0, -60.0).is_some());
        assert!(Azimuthal::south_polar_stereo().forward(0.0, 30.0).is_none());
    }

    #[test]
    fn test_equidistant_preserves_distance_from_centre() {
        let (x, y) = Azimuthal::azimuthal_equidistant().forward(0.0, 30.0).unwrap();
        let expected = EARTH_RADIUS * 30f64.to_radians();
        assert!(x.abs() < 1e-6);
        assert!((y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_nearside_perspective_horizon_is_inside_hemisphere() {
        let proj = Azimuthal::nearside_perspective();
        assert!(proj.max_angle < 90.0);
        assert!(proj.forward(85.0, 0.0).is_none());
        assert!(proj.forward(60.0, 0.0).is_some());
    }

    #[test]
    fn test_gnomonic_limit() {
        let proj = Azimuthal::gnomonic();
        assert!(proj.forward(70.0, 0.0).is_some());
        assert!(proj.forward(85.0, 0.0).is_none());
    }
}
