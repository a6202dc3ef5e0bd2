//! Pseudocylindrical world maps: Robinson, Mollweide, sinusoidal, Equal Earth,
//! the Eckert family and the interrupted Goode homolosine.

use std::f64::consts::PI;

use crate::transform::{delta_lon, newton, wrap_degrees, MapProjection, EARTH_RADIUS};

/// Robinson table, one row per 5° of latitude: (parallel length, distance from equator).
const ROBINSON_TABLE: [(f64, f64); 19] = [
    (1.0000, 0.0000),
    (0.9986, 0.0620),
    (0.9954, 0.1240),
    (0.9900, 0.1860),
    (0.9822, 0.2480),
    (0.9730, 0.3100),
    (0.9600, 0.3720),
    (0.9427, 0.4340),
    (0.9216, 0.4958),
    (0.8962, 0.5571),
    (0.8679, 0.6176),
    (0.8350, 0.6769),
    (0.7986, 0.7346),
    (0.7597, 0.7903),
    (0.7186, 0.8435),
    (0.6732, 0.8936),
    (0.6213, 0.9394),
    (0.5722, 0.9761),
    (0.5322, 1.0000),
];

/// Latitude where the homolosine switches from sinusoidal to Mollweide.
const HOMOLOSINE_LAT: f64 = 40.7368;

/// Vertical offset (in earth radii) aligning the Mollweide caps with the
/// sinusoidal band.
const HOMOLOSINE_Y_SHIFT: f64 = 0.0528035;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoKind {
    Robinson,
    Mollweide,
    Sinusoidal,
    EqualEarth,
    EckertI,
    EckertII,
    EckertIII,
    EckertIV,
    EckertV,
    EckertVI,
}

/// An uninterrupted pseudocylindrical projection.
#[derive(Debug, Clone)]
pub struct Pseudocylindrical {
    pub kind: PseudoKind,
    /// Central meridian in degrees
    pub lon0: f64,
}

impl Pseudocylindrical {
    pub fn new(kind: PseudoKind) -> Self {
        Self { kind, lon0: 0.0 }
    }
}

impl MapProjection for Pseudocylindrical {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let lam = delta_lon(lon, self.lon0);
        let (x, y) = unit_forward(self.kind, lam, lat.to_radians());
        Some((EARTH_RADIUS * x, EARTH_RADIUS * y))
    }

    fn central_longitude(&self) -> f64 {
        self.lon0
    }
}

/// Forward transform on the unit sphere.
fn unit_forward(kind: PseudoKind, lam: f64, phi: f64) -> (f64, f64) {
    match kind {
        PseudoKind::Robinson => robinson(lam, phi),
        PseudoKind::Mollweide => {
            let theta = mollweide_theta(phi);
            (
                2.0 * 2f64.sqrt() / PI * lam * theta.cos(),
                2f64.sqrt() * theta.sin(),
            )
        }
        PseudoKind::Sinusoidal => (lam * phi.cos(), phi),
        PseudoKind::EqualEarth => equal_earth(lam, phi),
        PseudoKind::EckertI => {
            let c = 2.0 * (2.0 / (3.0 * PI)).sqrt();
            (c * lam * (1.0 - phi.abs() / PI), c * phi)
        }
        PseudoKind::EckertII => {
            let a = (4.0 - 3.0 * phi.abs().sin()).sqrt();
            (
                2.0 * lam * a / (6.0 * PI).sqrt(),
                (2.0 * PI / 3.0).sqrt() * (2.0 - a) * phi.signum(),
            )
        }
        PseudoKind::EckertIII => {
            let c = (PI * (4.0 + PI)).sqrt();
            let inner = (1.0 - 4.0 * phi * phi / (PI * PI)).max(0.0).sqrt();
            (2.0 / c * lam * (1.0 + inner), 4.0 / c * phi)
        }
        PseudoKind::EckertIV => {
            let target = (2.0 + PI / 2.0) * phi.sin();
            let theta = if phi.abs() >= PI / 2.0 - 1e-12 {
                phi.signum() * PI / 2.0
            } else {
                newton(
                    phi / 2.0,
                    |t| t + t.sin() * t.cos() + 2.0 * t.sin() - target,
                    |t| 2.0 * t.cos() * (1.0 + t.cos()),
                )
            };
            (
                2.0 / (PI * (4.0 + PI)).sqrt() * lam * (1.0 + theta.cos()),
                2.0 * (PI / (4.0 + PI)).sqrt() * theta.sin(),
            )
        }
        PseudoKind::EckertV => {
            let c = (2.0 + PI).sqrt();
            (lam * (1.0 + phi.cos()) / c, 2.0 * phi / c)
        }
        PseudoKind::EckertVI => {
            let target = (1.0 + PI / 2.0) * phi.sin();
            let theta = if phi.abs() >= PI / 2.0 - 1e-12 {
                phi.signum() * PI / 2.0
            } else {
                newton(phi, |t| t + t.sin() - target, |t| 1.0 + t.cos())
            };
            let c = (2.0 + PI).sqrt();
            (lam * (1.0 + theta.cos()) / c, 2.0 * theta / c)
        }
    }
}

fn robinson(lam: f64, phi: f64) -> (f64, f64) {
    let deg = phi.abs().to_degrees().min(90.0);
    let idx = ((deg / 5.0).floor() as usize).min(ROBINSON_TABLE.len() - 2);
    let frac = (deg - idx as f64 * 5.0) / 5.0;
    let (x0, y0) = ROBINSON_TABLE[idx];
    let (x1, y1) = ROBINSON_TABLE[idx + 1];
    let plen = x0 + (x1 - x0) * frac;
    let pdfe = y0 + (y1 - y0) * frac;
    (0.8487 * plen * lam, 1.3523 * pdfe * phi.signum())
}

fn equal_earth(lam: f64, phi: f64) -> (f64, f64) {
    const A1: f64 = 1.340264;
    const A2: f64 = -0.081106;
    const A3: f64 = 0.000893;
    const A4: f64 = 0.003796;
    let m = 3f64.sqrt() / 2.0;
    let theta = (m * phi.sin()).asin();
    let t2 = theta * theta;
    let t6 = t2 * t2 * t2;
    let x = 2.0 * 3f64.sqrt() * lam * theta.cos()
        / (3.0 * (9.0 * A4 * t6 * t2 + 7.0 * A3 * t6 + 3.0 * A2 * t2 + A1));
    let y = theta * (A1 + A2 * t2 + t6 * (A3 + A4 * t2));
    (x, y)
}

/// Auxiliary angle θ of the Mollweide projection: 2θ + sin 2θ = π sin φ.
fn mollweide_theta(phi: f64) -> f64 {
    if phi.abs() >= PI / 2.0 - 1e-12 {
        return phi.signum() * PI / 2.0;
    }
    let target = PI * phi.sin();
    newton(
        phi,
        |t| 2.0 * t + (2.0 * t).sin() - target,
        |t| 2.0 + 2.0 * (2.0 * t).cos(),
    )
}

/// A lobe of an interrupted map: longitude range and its own central meridian.
#[derive(Debug, Clone, Copy)]
struct Lobe {
    west: f64,
    east: f64,
    central: f64,
}

const NORTH_LOBES: [Lobe; 2] = [
    Lobe { west: -180.0, east: -40.0, central: -100.0 },
    Lobe { west: -40.0, east: 180.0, central: 30.0 },
];

const SOUTH_LOBES: [Lobe; 4] = [
    Lobe { west: -180.0, east: -100.0, central: -160.0 },
    Lobe { west: -100.0, east: -20.0, central: -60.0 },
    Lobe { west: -20.0, east: 80.0, central: 20.0 },
    Lobe { west: 80.0, east: 180.0, central: 140.0 },
];

/// Goode homolosine interrupted over the oceans.
#[derive(Debug, Clone, Default)]
pub struct InterruptedGoodeHomolosine;

impl InterruptedGoodeHomolosine {
    fn lobe(lon: f64, lat: f64) -> (usize, Lobe) {
        let lon = wrap_degrees(lon);
        let lobes: &[Lobe] = if lat >= 0.0 { &NORTH_LOBES } else { &SOUTH_LOBES };
        let idx = lobes
            .iter()
            .position(|l| lon >= l.west && lon < l.east)
            .unwrap_or(lobes.len() - 1);
        let offset = if lat >= 0.0 { 0 } else { NORTH_LOBES.len() };
        (offset + idx, lobes[idx])
    }
}

impl MapProjection for InterruptedGoodeHomolosine {
    fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let (_, lobe) = Self::lobe(lon, lat);
        let lam = delta_lon(lon, lobe.central);
        let phi = lat.to_radians();
        let (x, y) = if lat.abs() <= HOMOLOSINE_LAT {
            unit_forward(PseudoKind::Sinusoidal, lam, phi)
        } else {
            let (x, y) = unit_forward(PseudoKind::Mollweide, lam, phi);
            (x, y - HOMOLOSINE_Y_SHIFT * phi.signum())
        };
        Some((
            EARTH_RADIUS * (lobe.central.to_radians() + x),
            EARTH_RADIUS * y,
        ))
    }

    fn breaks_between(&self, a: (f64, f64), b: (f64, f64)) -> bool {
        Self::lobe(a.0, a.1).0 != Self::lobe(b.0, b.1).0
            || (wrap_degrees(a.0) - wrap_degrees(b.0)).abs() > 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds() -> [PseudoKind; 10] {
        [
            PseudoKind::Robinson,
            PseudoKind::Mollweide,
            PseudoKind::Sinusoidal,
            PseudoKind::EqualEarth,
            PseudoKind::EckertI,
            PseudoKind::EckertII,
            PseudoKind::EckertIII,
            PseudoKind::EckertIV,
            PseudoKind::EckertV,
            PseudoKind::EckertVI,
        ]
    }

    #[test]
    fn test_origin_maps_to_zero() {
        for kind in all_kinds() {
            let (x, y) = Pseudocylindrical::new(kind).forward(0.0, 0.0).unwrap();
            assert!(x.abs() < 1e-6 && y.abs() < 1e-6, "{:?} origin: {} {}", kind, x, y);
        }
    }

    #[test]
    fn test_symmetric_about_equator_and_meridian() {
        for kind in all_kinds() {
            let proj = Pseudocylindrical::new(kind);
            let (x1, y1) = proj.forward(60.0, 35.0).unwrap();
            let (x2, y2) = proj.forward(-60.0, -35.0).unwrap();
            assert!((x1 + x2).abs() < 1e-3, "{:?}", kind);
            assert!((y1 + y2).abs() < 1e-3, "{:?}", kind);
        }
    }

    #[test]
    fn test_poles_are_finite() {
        for kind in all_kinds() {
            let (x, y) = Pseudocylindrical::new(kind).forward(120.0, 90.0).unwrap();
            assert!(x.is_finite() && y.is_finite(), "{:?}", kind);
            assert!(y > 0.0);
        }
    }

    #[test]
    fn test_mollweide_theta_equation() {
        let phi = 0.7;
        let theta = mollweide_theta(phi);
        let residual = 2.0 * theta + (2.0 * theta).sin() - PI * phi.sin();
        assert!(residual.abs() < 1e-9);
    }

    #[test]
    fn test_robinson_equator_width() {
        let (x, _) = Pseudocylindrical::new(PseudoKind::Robinson)
            .forward(180.0, 0.0)
            .unwrap();
        assert!((x / EARTH_RADIUS - 0.8487 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_goode_lobes_break_segments() {
        let proj = InterruptedGoodeHomolosine;
        assert!(proj.breaks_between((-41.0, 10.0), (-39.0, 10.0)));
        assert!(!proj.breaks_between((10.0, 10.0), (20.0, 10.0)));
        // Crossing the equator moves from a north lobe to a south lobe.
        assert!(proj.breaks_between((10.0, 1.0), (10.0, -1.0)));
    }

    #[test]
    fn test_goode_continuous_at_homolosine_latitude() {
        let proj = InterruptedGoodeHomolosine;
        let (_, below) = proj.forward(30.0, HOMOLOSINE_LAT - 1e-7).unwrap();
        let (_, above) = proj.forward(30.0, HOMOLOSINE_LAT + 1e-7).unwrap();
        assert!((below - above).abs() / EARTH_RADIUS < 1e-3);
    }
}
