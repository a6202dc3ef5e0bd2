//! Great-circle helpers on the projection sphere.

use std::f64::consts::PI;

use crate::transform::{wrap_degrees, EARTH_RADIUS};

/// Point reached from (lon, lat) after travelling `distance_m` along the
/// great circle leaving at `bearing_deg` (clockwise from north).
pub fn destination(lon: f64, lat: f64, bearing_deg: f64, distance_m: f64) -> (f64, f64) {
    let phi1 = lat.to_radians();
    let lam1 = lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * sin_phi2;
    let lam2 = lam1 + y.atan2(x);

    (wrap_degrees(lam2.to_degrees()), phi2.to_degrees())
}

/// Closed ring of `samples` points at `radius_m` around a centre.
pub fn circle(lon: f64, lat: f64, radius_m: f64, samples: usize) -> Vec<(f64, f64)> {
    let samples = samples.max(3);
    (0..samples)
        .map(|i| {
            let bearing = 360.0 * i as f64 / samples as f64;
            destination(lon, lat, bearing, radius_m)
        })
        .collect()
}

/// Great-circle distance between two points in meters.
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (phi1, phi2) = (a.1.to_radians(), b.1.to_radians());
    let dphi = phi2 - phi1;
    let dlam = (b.0 - a.0).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
}

/// Insert intermediate points so no step exceeds `max_step_deg` in either
/// coordinate. Keeps curved projections from drawing long straight chords.
pub fn densify(points: &[(f64, f64)], max_step_deg: f64) -> Vec<(f64, f64)> {
    if points.len() < 2 || max_step_deg <= 0.0 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dlon = b.0 - a.0;
        let dlat = b.1 - a.1;
        // Segments spanning the dateline are left alone; the caller splits them.
        let span = if dlon.abs() > 180.0 { dlat.abs() } else { dlon.abs().max(dlat.abs()) };
        let steps = (span / max_step_deg).ceil().max(1.0) as usize;
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            if dlon.abs() > 180.0 && i < steps {
                continue;
            }
            out.push((a.0 + dlon * t, a.1 + dlat * t));
        }
    }
    out
}

/// Half the circumference of the sphere, the longest possible distance.
pub fn max_distance() -> f64 {
    PI * EARTH_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_due_north() {
        let one_degree = EARTH_RADIUS * 1f64.to_radians();
        let (lon, lat) = destination(10.0, 50.0, 0.0, one_degree);
        assert!((lon - 10.0).abs() < 1e-9);
        assert!((lat - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_points_are_equidistant() {
        let ring = circle(-60.0, 40.0, 500_000.0, 80);
        assert_eq!(ring.len(), 80);
        for p in ring {
            assert!((distance((-60.0, 40.0), p) - 500_000.0).abs() < 1.0);
        }
    }

    #[test]
    fn test_densify_limits_step() {
        let dense = densify(&[(0.0, 0.0), (10.0, 0.0)], 2.0);
        assert_eq!(dense.len(), 6);
        assert_eq!(dense.last().copied(), Some((10.0, 0.0)));
    }

    #[test]
    fn test_densify_skips_dateline_chord() {
        let dense = densify(&[(179.0, 0.0), (-179.0, 0.0)], 0.5);
        assert_eq!(dense, vec![(179.0, 0.0), (-179.0, 0.0)]);
    }

    #[test]
    fn test_max_distance_is_antipodal() {
        assert!((distance((0.0, 0.0), (180.0, 0.0)) - max_distance()).abs() < 1.0);
    }
}
