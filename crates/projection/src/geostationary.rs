//! Geostationary satellite view.
//!
//! The satellite looks at the Earth from a fixed position above the equator;
//! coordinates are scan angles from nadir scaled by the satellite height, so a
//! full disk spans roughly ±5.4 million meters.
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4

use crate::transform::MapProjection;

/// Axis the scanning mirror sweeps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    /// GOES-R
    X,
    /// Meteosat and Himawari
    Y,
}

/// Geostationary projection parameters.
#[derive(Debug, Clone)]
pub struct Geostationary {
    /// Satellite height above Earth center (meters)
    /// This is perspective_point_height + semi_major_axis
    pub h: f64,
    /// Perspective point height above Earth surface (meters)
    pub perspective_point_height: f64,
    /// Semi-major axis of Earth ellipsoid (meters)
    pub req: f64,
    /// Semi-minor axis of Earth ellipsoid (meters)
    pub rpol: f64,
    /// Longitude of satellite nadir point (radians)
    pub lambda_0: f64,
    pub sweep: SweepAxis,
}

impl Default for Geostationary {
    /// A satellite over the Greenwich meridian sweeping around y.
    fn default() -> Self {
        Self::new(35785831.0, 0.0, SweepAxis::Y)
    }
}

impl Geostationary {
    /// Create a view from a satellite at `perspective_point_height` meters above
    /// the WGS84 ellipsoid, over `longitude_origin_deg`.
    pub fn new(perspective_point_height: f64, longitude_origin_deg: f64, sweep: SweepAxis) -> Self {
        let req = 6378137.0;
        Self {
            h: perspective_point_height + req,
            perspective_point_height,
            req,
            rpol: 6356752.31414,
            lambda_0: longitude_origin_deg.to_radians(),
            sweep,
        }
    }

    /// Convert geographic coordinates (lat/lon degrees) to scan angles (radians).
    ///
    /// Returns None if the point is not visible from the satellite.
    pub fn geo_to_scan(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let lat_rad = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lambda_0;

        // Beyond the limb as seen from the satellite
        let cos_c = lat_rad.cos() * dlon.cos();
        let horizon_angle = (self.req / self.h).acos();
        if cos_c.clamp(-1.0, 1.0).acos() > horizon_angle {
            return None;
        }

        // Geocentric latitude (accounting for Earth's oblateness)
        let phi_c = ((self.rpol / self.req).powi(2) * lat_rad.tan()).atan();
        let e2 = 1.0 - (self.rpol / self.req).powi(2);
        let rc = self.rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        // Satellite-centred cartesian coordinates
        let sx = self.h - rc * phi_c.cos() * dlon.cos();
        let sy = -rc * phi_c.cos() * dlon.sin();
        let sz = rc * phi_c.sin();

        if sx <= 0.0 {
            return None;
        }

        let scan = match self.sweep {
            SweepAxis::X => ((-sy).atan2(sx.hypot(sz)), sz.atan2(sx)),
            SweepAxis::Y => ((-sy).atan2(sx), sz.atan2(sx.hypot(sy))),
        };
        Some(scan)
    }

    /// Convert scan angles (radians) back to geographic coordinates (lon, lat degrees).
    ///
    /// Returns None if the scan angle points to space (off Earth).
    pub fn scan_to_geo(&self, x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
        // Unit view direction in the satellite frame
        let (dx, dy, dz) = match self.sweep {
            SweepAxis::X => (x_rad.cos() * y_rad.cos(), -x_rad.sin(), x_rad.cos() * y_rad.sin()),
            SweepAxis::Y => (x_rad.cos() * y_rad.cos(), -x_rad.sin() * y_rad.cos(), y_rad.sin()),
        };

        let ratio = (self.req / self.rpol).powi(2);
        let a = dx * dx + dy * dy + ratio * dz * dz;
        let b = -2.0 * self.h * dx;
        let c = self.h.powi(2) - self.req.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let rs = (-b - discriminant.sqrt()) / (2.0 * a);

        let sx = rs * dx;
        let sy = rs * dy;
        let sz = rs * dz;

        let lat = (ratio * sz / (self.h - sx).hypot(sy)).atan();
        let lon = self.lambda_0 - sy.atan2(self.h - sx);
        Some((lon.to_degrees(), lat.to_degrees()))
    }
}

impl MapProjection for Geostationary {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let (x, y) = self.geo_to_scan(lon, lat)?;
        Some((
            x * self.perspective_point_height,
            y * self.perspective_point_height,
        ))
    }

    fn central_longitude(&self) -> f64 {
        self.lambda_0.to_degrees()
    }

    fn breaks_between(&self, _a: (f64, f64), _b: (f64, f64)) -> bool {
        false
    }
}
