//! The projection trait and shared angle helpers.

use std::f64::consts::PI;
use std::fmt::Debug;

/// Earth radius (meters) of the sphere every projection is computed on.
pub const EARTH_RADIUS: f64 = 6371229.0;

/// A forward map projection from geographic degrees to projected meters.
pub trait MapProjection: Debug + Send + Sync {
    /// Project a point given in degrees.
    ///
    /// Returns `None` when the projection cannot show the point: far
    /// hemisphere of a perspective view, poles on Mercator, and so on.
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)>;

    /// Longitude (degrees) of the central meridian.
    fn central_longitude(&self) -> f64 {
        0.0
    }

    /// Whether the straight projected segment between two geographic points
    /// would cross a cut in the map (the antimeridian opposite the central
    /// meridian for world maps, lobe boundaries for interrupted maps).
    fn breaks_between(&self, a: (f64, f64), b: (f64, f64)) -> bool {
        let da = wrap_degrees(a.0 - self.central_longitude());
        let db = wrap_degrees(b.0 - self.central_longitude());
        (da - db).abs() > 180.0
    }
}

/// Wrap an angle in degrees into [-180, 180]. Both edges are kept as given.
pub fn wrap_degrees(deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&deg) {
        return deg;
    }
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Wrap an angle in radians into [-π, π]. Both edges are kept as given.
pub fn wrap_radians(rad: f64) -> f64 {
    if (-PI..=PI).contains(&rad) {
        return rad;
    }
    (rad + PI).rem_euclid(2.0 * PI) - PI
}

/// Longitude offset from a central meridian, in radians, wrapped.
pub fn delta_lon(lon_deg: f64, lon0_deg: f64) -> f64 {
    wrap_radians((lon_deg - lon0_deg).to_radians())
}

/// Solve `f(θ) = 0` by Newton iteration, used by the equal-area world maps
/// whose auxiliary angle has no closed form.
pub(crate) fn newton<F, D>(start: f64, f: F, df: D) -> f64
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut theta = start;
    for _ in 0..30 {
        let slope = df(theta);
        if slope.abs() < 1e-12 {
            break;
        }
        let step = f(theta) / slope;
        theta -= step;
        if step.abs() < 1e-12 {
            break;
        }
    }
    theta
}
