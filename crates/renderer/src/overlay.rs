//! Map decorations drawn over the background: coastlines, graticule and
//! Tissot's indicatrices.

use projection::geodesy;
use tiny_skia::PathBuilder;
use tracing::debug;

use crate::background::visible_region;
use crate::canvas::{push_polyline, MapCanvas};
use crate::coastline::Coastlines;
use crate::colormap::Color;

/// Lines are densified to this step (degrees) before projection.
const DENSIFY_STEP: f64 = 2.0;

const COASTLINE_COLOR: Color = Color::rgb(0, 0, 0);
const GRIDLINE_COLOR: Color = Color::new(128, 128, 128, 200);
const GRIDLINE_DASH: [f32; 2] = [4.0, 3.0];
const TISSOT_FILL: Color = Color::new(255, 127, 14, 110);
const TISSOT_EDGE: Color = Color::new(200, 80, 0, 220);

/// Candidate graticule spacings (degrees).
const GRID_STEPS: [f64; 13] = [
    0.1, 0.2, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0,
];
/// Most graticule lines wanted along one axis.
const MAX_GRID_LINES: f64 = 8.0;

/// Tissot circle radius (meters) and sampling.
const TISSOT_RADIUS: f64 = 500_000.0;
const TISSOT_SAMPLES: usize = 80;
const TISSOT_LATS: [f64; 6] = [-80.0, -48.0, -16.0, 16.0, 48.0, 80.0];

pub fn draw_coastlines(canvas: &mut MapCanvas, coast: &Coastlines) {
    for line in coast.lines() {
        let dense = geodesy::densify(line, DENSIFY_STEP);
        canvas.stroke_geo_line(&dense, COASTLINE_COLOR, 0.8, None);
    }
    debug!(lines = coast.lines().len(), "Drew coastlines");
}

/// Smallest spacing giving at most a handful of lines over `span` degrees.
pub fn grid_step(span: f64) -> f64 {
    GRID_STEPS
        .iter()
        .copied()
        .find(|step| span / step <= MAX_GRID_LINES)
        .unwrap_or(90.0)
}

/// Multiples of `step` within `[lo, hi]`.
fn grid_values(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Dashed meridians and parallels at round spacings.
pub fn draw_gridlines(canvas: &mut MapCanvas) {
    let extent = *canvas.extent();
    let region = visible_region(&extent);
    let lon_step = grid_step(extent.lon_span());
    let lat_step = grid_step(extent.lat_span());

    let meridians = grid_values(region.min_lon, region.max_lon, lon_step);
    let parallels = grid_values(region.min_lat, region.max_lat, lat_step);

    for &lon in &meridians {
        let line = [(lon, region.min_lat), (lon, region.max_lat)];
        let dense = geodesy::densify(&line, DENSIFY_STEP.min(lat_step));
        canvas.stroke_geo_line(&dense, GRIDLINE_COLOR, 0.7, Some(&GRIDLINE_DASH));
    }
    for &lat in &parallels {
        let line = [(region.min_lon, lat), (region.max_lon, lat)];
        let dense = geodesy::densify(&line, DENSIFY_STEP.min(lon_step));
        canvas.stroke_geo_line(&dense, GRIDLINE_COLOR, 0.7, Some(&GRIDLINE_DASH));
    }
    debug!(
        lon_step = lon_step,
        lat_step = lat_step,
        meridians = meridians.len(),
        parallels = parallels.len(),
        "Drew gridlines"
    );
}

/// Centres of the indicatrix lattice.
pub fn tissot_centres() -> Vec<(f64, f64)> {
    TISSOT_LATS
        .iter()
        .flat_map(|&lat| (0..6).map(move |i| (-180.0 + 60.0 * i as f64, lat)))
        .collect()
}

/// Equal-radius geodesic circles showing the projection's distortion.
pub fn draw_tissot(canvas: &mut MapCanvas) {
    let mut fills = PathBuilder::new();
    let mut drawn = 0;
    for (lon, lat) in tissot_centres() {
        let ring = geodesy::circle(lon, lat, TISSOT_RADIUS, TISSOT_SAMPLES);
        match canvas.project_ring(&ring) {
            Some(points) => {
                push_polyline(&mut fills, &points, true);
                drawn += 1;
            }
            None => {
                // Cut by the projection: outline only the visible parts
                let mut closed = ring.clone();
                closed.push(ring[0]);
                canvas.stroke_geo_line(&closed, TISSOT_EDGE, 1.0, None);
            }
        }
    }
    if let Some(path) = fills.finish() {
        canvas.fill_path(&path, TISSOT_FILL, true);
        canvas.stroke_path(&path, TISSOT_EDGE, 1.0, None);
    }
    debug!(filled = drawn, "Drew Tissot indicatrices");
}
