//! Transverse Mercator and the national grids built on it.

use crate::transform::{delta_lon, MapProjection, EARTH_RADIUS};

/// Largest |cos φ sin Δλ| drawn; beyond it the map runs off to infinity.
const MAX_B: f64 = 0.98;

/// Spherical transverse Mercator.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in degrees
    pub lon0: f64,
    /// Latitude of origin in degrees
    pub lat0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self {
            lon0: 0.0,
            lat0: 0.0,
            k0: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

impl TransverseMercator {
    /// UTM zone 32N, the projection used for European maps.
    pub fn euro_pp() -> Self {
        Self::utm(32)
    }

    /// Northern-hemisphere UTM zone.
    pub fn utm(zone: u8) -> Self {
        Self {
            lon0: -183.0 + 6.0 * zone as f64,
            lat0: 0.0,
            k0: 0.9996,
            false_easting: 500000.0,
            false_northing: 0.0,
        }
    }

    /// Ordnance Survey National Grid of Great Britain.
    pub fn osgb() -> Self {
        Self {
            lon0: -2.0,
            lat0: 49.0,
            k0: 0.9996012717,
            false_easting: 400000.0,
            false_northing: -100000.0,
        }
    }

    /// Irish grid used by Ordnance Survey Northern Ireland.
    pub fn osni() -> Self {
        Self {
            lon0: -8.0,
            lat0: 53.5,
            k0: 1.000035,
            false_easting: 200000.0,
            false_northing: 250000.0,
        }
    }
}

impl MapProjection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let phi = lat.to_radians();
        let dlon = delta_lon(lon, self.lon0);
        let b = phi.cos() * dlon.sin();
        if b.abs() > MAX_B {
            return None;
        }
        let x = self.k0 * EARTH_RADIUS * b.atanh() + self.false_easting;
        let y = self.k0 * EARTH_RADIUS * (phi.tan().atan2(dlon.cos()) - self.lat0.to_radians())
            + self.false_northing;
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
    fn test_central_meridian_is_true_scale() {
        let proj = TransverseMercator::default();
        let (x, y) = proj.forward(0.0, 10.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!((y - EARTH_RADIUS * 10f64.to_radians()).abs() < 1e-3);
    }

    #[test]
    fn test_osgb_false_origin() {
        let proj = TransverseMercator::osgb();
        let (x, y) = proj.forward(-2.0, 49.0).unwrap();
        assert!((x - 400000.0).abs() < 1e-6);
        assert!((y + 100000.0).abs() < 1e-6);
    }

    #[test]
    fn test_utm_zone_32_central_meridian() {
        assert_eq!(TransverseMercator::euro_pp().lon0, 9.0);
    }

    #[test]
    fn test_far_from_meridian_is_hidden() {
        let proj = TransverseMercator::default();
        assert!(proj.forward(89.0, 0.0).is_none());
        assert!(proj.forward(60.0, 0.0).is_some());
    }
}
