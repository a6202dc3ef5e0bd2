//! Conic projections: Lambert conformal, Albers equal-area and equidistant conic.
//!
//! Each maps a cone tangent or secant to the sphere along its standard
//! parallel(s) onto a flat plane. Parameters:
//! - Central meridian (lon0) and latitude of origin (lat0)
//! - Standard parallels (latin1, latin2), equal for a tangent cone

use std::f64::consts::PI;

use crate::transform::{delta_lon, MapProjection, EARTH_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConicKind {
    LambertConformal,
    AlbersEqualArea,
    EquidistantConic,
}

/// A conic projection with its precomputed cone constants.
#[derive(Debug, Clone)]
pub struct Conic {
    pub kind: ConicKind,
    /// Central meridian in degrees
    pub lon0: f64,
    /// Latitude of origin in degrees
    pub lat0: f64,
    /// First standard parallel in degrees
    pub latin1: f64,
    /// Second standard parallel in degrees
    pub latin2: f64,
    /// Latitude beyond which the cone is not drawn, on the side away from its apex
    pub cutoff: f64,
    /// Cone constant (n)
    n: f64,
    /// Projection-specific constant: F (conformal), C (Albers), G (equidistant)
    c: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl Conic {
    /// Create a conic projection; all angles in degrees.
    pub fn new(kind: ConicKind, lon0: f64, lat0: f64, latin1: f64, latin2: f64) -> Self {
        let phi1 = latin1.to_radians();
        let phi2 = latin2.to_radians();
        let tangent = (phi1 - phi2).abs() < 1e-10;

        let (n, c) = match kind {
            ConicKind::LambertConformal => {
                let n = if tangent {
                    phi1.sin()
                } else {
                    let ln_ratio = (phi1.cos() / phi2.cos()).ln();
                    let tan_ratio =
                        ((PI / 4.0 + phi2 / 2.0).tan() / (PI / 4.0 + phi1 / 2.0).tan()).ln();
                    ln_ratio / tan_ratio
                };
                let f = phi1.cos() * (PI / 4.0 + phi1 / 2.0).tan().powf(n) / n;
                (n, f)
            }
            ConicKind::AlbersEqualArea => {
                let n = (phi1.sin() + phi2.sin()) / 2.0;
                let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();
                (n, c)
            }
            ConicKind::EquidistantConic => {
                let n = if tangent {
                    phi1.sin()
                } else {
                    (phi1.cos() - phi2.cos()) / (phi2 - phi1)
                };
                let g = phi1.cos() / n + phi1;
                (n, g)
            }
        };

        let cutoff = if n >= 0.0 { -30.0 } else { 30.0 };
        let mut conic = Self {
            kind,
            lon0,
            lat0,
            latin1,
            latin2,
            cutoff,
            n,
            c,
            rho0: 0.0,
        };
        conic.rho0 = conic.rho(lat0.to_radians()).unwrap_or(0.0);
        conic
    }

    /// Lambert conformal with the usual North American defaults.
    pub fn lambert_conformal() -> Self {
        Self::new(ConicKind::LambertConformal, -96.0, 39.0, 33.0, 45.0)
    }

    /// Lambert conformal centred on a region, with a tangent cone through its
    /// middle latitude, as used for limited-area model domains.
    pub fn lambert_conformal_centred(lon0: f64, lat0: f64) -> Self {
        Self::new(ConicKind::LambertConformal, lon0, lat0, lat0, lat0)
    }

    pub fn albers_equal_area() -> Self {
        Self::new(ConicKind::AlbersEqualArea, 0.0, 0.0, 20.0, 50.0)
    }

    pub fn equidistant_conic() -> Self {
        Self::new(ConicKind::EquidistantConic, 0.0, 0.0, 20.0, 50.0)
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Radius of the parallel at latitude `phi` (radians) on the developed cone.
    fn rho(&self, phi: f64) -> Option<f64> {
        let rho = match self.kind {
            ConicKind::LambertConformal => {
                let t = (PI / 4.0 + phi / 2.0).tan();
                if t <= 0.0 || !t.is_finite() {
                    return None;
                }
                EARTH_RADIUS * self.c / t.powf(self.n)
            }
            ConicKind::AlbersEqualArea => {
                let inner = self.c - 2.0 * self.n * phi.sin();
                if inner < 0.0 {
                    return None;
                }
                EARTH_RADIUS * inner.sqrt() / self.n
            }
            ConicKind::EquidistantConic => EARTH_RADIUS * (self.c - phi),
        };
        rho.is_finite().then_some(rho)
    }
}

impl MapProjection for Conic {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        if (self.n >= 0.0 && lat < self.cutoff) || (self.n < 0.0 && lat > self.cutoff) {
            return None;
        }
        let rho = self.rho(lat.to_radians())?;
        let theta = self.n * delta_lon(lon, self.lon0);
        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        Some((x, y))
    }

    fn central_longitude(&self) -> f64 {
        self.lon0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        for proj in [
            Conic::lambert_conformal(),
            Conic::albers_equal_area(),
            Conic::equidistant_conic(),
        ] {
            let (x, y) = proj.forward(proj.lon0, proj.lat0).unwrap();
            assert!(x.abs() < 1e-6 && y.abs() < 1e-6, "{:?}", proj.kind);
        }
    }

    #[test]
    fn test_lambert_tangent_cone_constant() {
        let proj = Conic::lambert_conformal_centred(20.0, 78.0);
        assert!((proj.cone_constant() - 78f64.to_radians().sin()).abs() < 1e-12);
    }

    #[test]
    fn test_lambert_cutoff_hides_far_hemisphere() {
        let proj = Conic::lambert_conformal();
        assert!(proj.forward(-96.0, -45.0).is_none());
        assert!(proj.forward(-96.0, -20.0).is_some());
    }

    #[test]
    fn test_meridians_converge_northwards() {
        let proj = Conic::lambert_conformal();
        let (xw_s, _) = proj.forward(-110.0, 30.0).unwrap();
        let (xe_s, _) = proj.forward(-82.0, 30.0).unwrap();
        let (xw_n, _) = proj.forward(-110.0, 50.0).unwrap();
        let (xe_n, _) = proj.forward(-82.0, 50.0).unwrap();
        assert!((xe_n - xw_n) < (xe_s - xw_s));
    }

    #[test]
    fn test_equidistant_conic_meridian_spacing() {
        let proj = Conic::equidistant_conic();
        let (_, y0) = proj.forward(0.0, 10.0).unwrap();
        let (_, y1) = proj.forward(0.0, 20.0).unwrap();
        let expected = EARTH_RADIUS * 10f64.to_radians();
        assert!(((y1 - y0) - expected).abs() < 1e-3);
    }
}
