//! Data layer: filled contours, mesh cells and point markers.
//!
//! The layer is drawn opaque on its own pixmap and blended onto the map at
//! half opacity, so bands that meet along a shared edge do not darken it.

use gridded_data::{Field, FieldLayout};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::debug;

use diana_common::PlotStyle;

use crate::canvas::{push_polyline, MapCanvas};
use crate::colormap::{Color, Colormap};
use crate::contour::{band_index, bands_spanned, clip_band, ValuePoint};
use crate::error::RenderResult;

/// Opacity of the data layer over the base map.
pub const DATA_OPACITY: f32 = 0.5;

/// Radius of point markers (pixels).
const MARKER_RADIUS: f32 = 3.0;

/// Draw a field onto the map, banded by `levels` and colored by `colormap`.
///
/// Returns the number of shapes filled. Points that are missing, hidden by
/// the projection or outside the levels are left blank.
pub fn draw_field(
    canvas: &mut MapCanvas,
    field: &Field,
    levels: &[f32],
    colormap: &Colormap,
    style: PlotStyle,
) -> RenderResult<usize> {
    if levels.len() < 2 || field.is_empty() {
        return Ok(0);
    }
    let colors = colormap.band_colors(levels.len() - 1);
    let mut bands: Vec<PathBuilder> = (0..colors.len()).map(|_| PathBuilder::new()).collect();

    let shapes = match (field.layout, style) {
        (FieldLayout::Grid { nx, ny }, PlotStyle::Filled) => {
            fill_triangles(canvas, field, nx, ny, levels, &mut bands)
        }
        (FieldLayout::Grid { nx, ny }, PlotStyle::Mesh) => {
            fill_cells(canvas, field, nx, ny, levels, &mut bands)
        }
        (FieldLayout::Points, _) => add_markers(canvas, field, levels, &mut bands),
    };

    let mut layer = canvas.new_layer()?;
    for (pb, color) in bands.into_iter().zip(&colors) {
        if let Some(path) = pb.finish() {
            fill_layer(&mut layer, &path, *color, matches!(field.layout, FieldLayout::Points));
        }
    }
    canvas.composite(&layer, DATA_OPACITY);

    debug!(
        variable = %field.variable,
        style = %style,
        bands = colors.len(),
        shapes = shapes,
        "Drew data layer"
    );
    Ok(shapes)
}

fn fill_layer(layer: &mut Pixmap, path: &tiny_skia::Path, color: Color, anti_alias: bool) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    layer.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
}

/// Project grid point `idx` with its value; `None` when missing or hidden.
fn vertex(canvas: &MapCanvas, field: &Field, idx: usize) -> Option<ValuePoint> {
    let value = *field.values.get(idx)?;
    if !value.is_finite() {
        return None;
    }
    let (x, y) = canvas.project(field.lon[idx], field.lat[idx])?;
    Some(ValuePoint::new(x, y, value))
}

/// Whether any edge of a grid polygon crosses a cut of the projection.
fn crosses_cut(canvas: &MapCanvas, field: &Field, corners: &[usize]) -> bool {
    let proj = canvas.projection();
    (0..corners.len()).any(|i| {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        proj.breaks_between((field.lon[a], field.lat[a]), (field.lon[b], field.lat[b]))
    })
}

/// Split every grid cell into two triangles and clip each against every
/// band it spans.
fn fill_triangles(
    canvas: &MapCanvas,
    field: &Field,
    nx: usize,
    ny: usize,
    levels: &[f32],
    bands: &mut [PathBuilder],
) -> usize {
    let mut shapes = 0;
    for row in 0..ny.saturating_sub(1) {
        for col in 0..nx.saturating_sub(1) {
            let a = row * nx + col;
            let b = a + 1;
            let c = a + nx;
            let d = c + 1;
            for tri in [[a, b, d], [a, d, c]] {
                if crosses_cut(canvas, field, &tri) {
                    continue;
                }
                let (Some(p0), Some(p1), Some(p2)) = (
                    vertex(canvas, field, tri[0]),
                    vertex(canvas, field, tri[1]),
                    vertex(canvas, field, tri[2]),
                ) else {
                    continue;
                };
                let Some(span) = bands_spanned(levels, &[p0.value, p1.value, p2.value]) else {
                    continue;
                };
                for band in span {
                    let piece = clip_band(&[p0, p1, p2], levels[band], levels[band + 1]);
                    if piece.is_empty() {
                        continue;
                    }
                    let points: Vec<(f32, f32)> = piece.iter().map(|p| (p.x, p.y)).collect();
                    push_polyline(&mut bands[band], &points, true);
                    shapes += 1;
                }
            }
        }
    }
    shapes
}

/// One quad per grid cell, colored by the mean of its corners.
fn fill_cells(
    canvas: &MapCanvas,
    field: &Field,
    nx: usize,
    ny: usize,
    levels: &[f32],
    bands: &mut [PathBuilder],
) -> usize {
    let mut shapes = 0;
    for row in 0..ny.saturating_sub(1) {
        for col in 0..nx.saturating_sub(1) {
            let a = row * nx + col;
            let quad = [a, a + 1, a + nx + 1, a + nx];
            if crosses_cut(canvas, field, &quad) {
                continue;
            }
            let corners: Option<Vec<ValuePoint>> =
                quad.iter().map(|&i| vertex(canvas, field, i)).collect();
            let Some(corners) = corners else {
                continue;
            };
            let mean = corners.iter().map(|p| p.value).sum::<f32>() / 4.0;
            let Some(band) = band_index(levels, mean) else {
                continue;
            };
            let points: Vec<(f32, f32)> = corners.iter().map(|p| (p.x, p.y)).collect();
            push_polyline(&mut bands[band], &points, true);
            shapes += 1;
        }
    }
    shapes
}

/// Unstructured points are drawn as small discs.
fn add_markers(
    canvas: &MapCanvas,
    field: &Field,
    levels: &[f32],
    bands: &mut [PathBuilder],
) -> usize {
    let mut shapes = 0;
    for idx in 0..field.len() {
        let Some(p) = vertex(canvas, field, idx) else {
            continue;
        };
        let Some(band) = band_index(levels, p.value) else {
            continue;
        };
        bands[band].push_circle(p.x, p.y, MARKER_RADIUS);
        shapes += 1;
    }
    shapes
}
