//! Base-map background: shaded ocean and land, or an equirectangular image.
//!
//! The visible region is tiled in longitude and latitude and every tile is
//! projected and filled with one color. Tiles sharing a color are gathered
//! into one path.

use std::collections::HashMap;
use std::path::Path;

use diana_common::Extent;
use image::RgbaImage;
use tiny_skia::PathBuilder;
use tracing::{debug, info};

use crate::canvas::{push_polyline, MapCanvas};
use crate::coastline::Coastlines;
use crate::colormap::{interpolate_color, Color};
use crate::error::RenderResult;

const OCEAN_EQUATOR: Color = Color::rgb(140, 186, 214);
const OCEAN_POLAR: Color = Color::rgb(205, 226, 238);
const LAND: Color = Color::rgb(204, 196, 160);
const ICE: Color = Color::rgb(240, 240, 236);

/// Tiles are nudged inward by this much (degrees) so their corners never sit
/// exactly on a lobe boundary or cut.
const EDGE_NUDGE: f64 = 1e-7;

/// A global equirectangular raster (longitude -180..180, latitude 90..-90).
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    image: RgbaImage,
}

impl BackgroundImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Load any format the `image` crate decodes.
    pub fn load(path: &Path) -> RenderResult<Self> {
        info!(path = %path.display(), "Loading background image");
        let image = image::open(path)?.to_rgba8();
        debug!(width = image.width(), height = image.height(), "Background image decoded");
        Ok(Self { image })
    }

    /// Nearest pixel at a geographic point.
    pub fn sample(&self, lon: f64, lat: f64) -> Color {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return OCEAN_EQUATOR;
        }
        let fx = ((lon + 180.0) / 360.0).clamp(0.0, 1.0) * w as f64;
        let fy = ((90.0 - lat) / 180.0).clamp(0.0, 1.0) * h as f64;
        let x = (fx as u32).min(w - 1);
        let y = (fy as u32).min(h - 1);
        let [r, g, b, _] = self.image.get_pixel(x, y).0;
        Color::rgb(r, g, b)
    }
}

/// Built-in shading: land, ice caps, and ocean lightening toward the poles
/// in 10° steps.
fn shaded_color(coast: &Coastlines, lon: f64, lat: f64) -> Color {
    if coast.is_land(lon, lat) {
        if lat.abs() > 62.0 {
            ICE
        } else {
            LAND
        }
    } else {
        let band = (lat.abs() / 10.0).floor() / 9.0;
        interpolate_color(OCEAN_EQUATOR, OCEAN_POLAR, band as f32)
    }
}

/// Geographic region tiled for a view: the extent widened by half its span
/// on every side, since the map frame can show more than the extent.
pub(crate) fn visible_region(extent: &Extent) -> Extent {
    let pad_lon = extent.lon_span() * 0.5;
    let pad_lat = extent.lat_span() * 0.5;
    Extent::new(
        (extent.min_lon - pad_lon).max(-180.0),
        (extent.max_lon + pad_lon).min(180.0),
        (extent.min_lat - pad_lat).max(-90.0),
        (extent.max_lat + pad_lat).min(90.0),
    )
}

/// Fill the map with the background.
pub fn draw_background(
    canvas: &mut MapCanvas,
    coast: &Coastlines,
    image: Option<&BackgroundImage>,
) {
    let region = visible_region(canvas.extent());
    let step = (region.lon_span().max(region.lat_span()) / 180.0).clamp(0.02, 2.0);
    let cols = (region.lon_span() / step).ceil().max(1.0) as usize;
    let rows = (region.lat_span() / step).ceil().max(1.0) as usize;

    let mut groups: HashMap<Color, PathBuilder> = HashMap::new();
    let mut tiles = 0usize;

    for row in 0..rows {
        let lat0 = region.min_lat + row as f64 * step;
        let lat1 = (lat0 + step).min(region.max_lat);
        for col in 0..cols {
            let lon0 = region.min_lon + col as f64 * step;
            let lon1 = (lon0 + step).min(region.max_lon);
            let ring = [
                (lon0 + EDGE_NUDGE, lat0 + EDGE_NUDGE),
                (lon1 - EDGE_NUDGE, lat0 + EDGE_NUDGE),
                (lon1 - EDGE_NUDGE, lat1 - EDGE_NUDGE),
                (lon0 + EDGE_NUDGE, lat1 - EDGE_NUDGE),
            ];
            let Some(points) = canvas.project_ring(&ring) else {
                continue;
            };
            let (clon, clat) = ((lon0 + lon1) / 2.0, (lat0 + lat1) / 2.0);
            let color = match image {
                Some(img) => img.sample(clon, clat),
                None => shaded_color(coast, clon, clat),
            };
            push_polyline(groups.entry(color).or_default(), &points, true);
            tiles += 1;
        }
    }

    let colors = groups.len();
    for (color, pb) in groups {
        if let Some(path) = pb.finish() {
            // Anti-aliasing would leave hairline seams between tiles
            canvas.fill_path(&path, color, false);
        }
    }
    debug!(tiles = tiles, colors = colors, step = step, "Drew background");
}
