//! The raster map canvas: a pixmap with a projection fitted into it.
//!
//! The projected bounding box of the requested extent is scaled uniformly
//! into the map area of the figure and centred there. Everything drawn on
//! the map is clipped to that box; the colorbar below it is not.

use diana_common::Extent;
use projection::{MapProjection, ProjectionKind};
use serde::{Deserialize, Serialize};
use tiny_skia::{
    FillRule, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, StrokeDash,
    Transform,
};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};

/// Samples per axis used to find the projected bounds of an extent.
const VIEW_SAMPLES: usize = 64;

/// Figure background.
pub const FIGURE_BACKGROUND: Color = Color::rgb(255, 255, 255);

/// Figure size and the space reserved around and below the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureLayout {
    pub width: u32,
    pub height: u32,
    /// Blank border around the figure (pixels)
    pub margin: u32,
    /// Space below the map kept for the colorbar (pixels)
    pub legend_height: u32,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            margin: 12,
            legend_height: 56,
        }
    }
}

impl FigureLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Area the map is fitted into: (x, y, width, height).
    pub fn map_area(&self) -> RenderResult<(f64, f64, f64, f64)> {
        let w = self.width as f64 - 2.0 * self.margin as f64;
        let h = self.height as f64 - 2.0 * self.margin as f64 - self.legend_height as f64;
        if w < 1.0 || h < 1.0 {
            return Err(RenderError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok((self.margin as f64, self.margin as f64, w, h))
    }

    /// Area of the colorbar strip: (x, y, width, height).
    pub fn legend_area(&self) -> (f32, f32, f32, f32) {
        let inner = self.width.saturating_sub(2 * self.margin) as f32;
        let bar_height = (self.legend_height as f32 * 0.3).max(4.0);
        let y = self.height.saturating_sub(self.margin) as f32 - self.legend_height as f32 * 0.6;
        (
            self.margin as f32 + inner * 0.1,
            y,
            inner * 0.8,
            bar_height,
        )
    }
}

/// A blank map under one projection, ready for overlays.
pub struct MapCanvas {
    kind: ProjectionKind,
    projection: Box<dyn MapProjection>,
    extent: Extent,
    layout: FigureLayout,
    pixmap: Pixmap,
    mask: Mask,
    frame: Rect,
    /// Projected centre of the view box (meters)
    centre: (f64, f64),
    /// Pixel position of the projected centre
    pixel_centre: (f64, f64),
    /// Pixels per projected meter
    scale: f64,
}

impl MapCanvas {
    /// Build a blank canvas showing `extent` under `kind`.
    pub fn new(kind: ProjectionKind, extent: &Extent, layout: &FigureLayout) -> RenderResult<Self> {
        let projection = kind.build();
        let (xmin, xmax, ymin, ymax) =
            projected_bounds(projection.as_ref(), extent).ok_or_else(|| RenderError::EmptyView {
                projection: kind.to_string(),
                extent: extent.to_string(),
            })?;

        let (ax, ay, aw, ah) = layout.map_area()?;
        let span_x = (xmax - xmin).max(1.0);
        let span_y = (ymax - ymin).max(1.0);
        let scale = (aw / span_x).min(ah / span_y);
        let fw = span_x * scale;
        let fh = span_y * scale;
        let fx = ax + (aw - fw) / 2.0;
        let fy = ay + (ah - fh) / 2.0;

        let invalid = || RenderError::InvalidSize {
            width: layout.width,
            height: layout.height,
        };
        let frame = Rect::from_xywh(fx as f32, fy as f32, fw as f32, fh as f32).ok_or_else(invalid)?;
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(invalid)?;
        pixmap.fill(FIGURE_BACKGROUND.to_skia());
        let mut mask = Mask::new(layout.width, layout.height).ok_or_else(invalid)?;
        mask.fill_path(
            &PathBuilder::from_rect(frame),
            FillRule::Winding,
            false,
            Transform::identity(),
        );

        Ok(Self {
            kind,
            projection,
            extent: *extent,
            layout: *layout,
            pixmap,
            mask,
            frame,
            centre: ((xmin + xmax) / 2.0, (ymin + ymax) / 2.0),
            pixel_centre: (fx + fw / 2.0, fy + fh / 2.0),
            scale,
        })
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn projection(&self) -> &dyn MapProjection {
        self.projection.as_ref()
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn layout(&self) -> &FigureLayout {
        &self.layout
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Project a geographic point to pixel coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f32, f32)> {
        let (x, y) = self.projection.forward(lon, lat)?;
        let px = self.pixel_centre.0 + (x - self.centre.0) * self.scale;
        let py = self.pixel_centre.1 - (y - self.centre.1) * self.scale;
        (px.is_finite() && py.is_finite()).then_some((px as f32, py as f32))
    }

    /// Project a closed ring; `None` if any vertex is hidden or the ring
    /// crosses a cut of the projection.
    pub fn project_ring(&self, ring: &[(f64, f64)]) -> Option<Vec<(f32, f32)>> {
        let mut out = Vec::with_capacity(ring.len());
        for (i, &(lon, lat)) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            if self.projection.breaks_between((lon, lat), next) {
                return None;
            }
            out.push(self.project(lon, lat)?);
        }
        Some(out)
    }

    /// Project a polyline, splitting it wherever it leaves the visible
    /// domain, crosses a cut or jumps across the map.
    pub fn project_polyline(&self, points: &[(f64, f64)]) -> Vec<Vec<(f32, f32)>> {
        let max_jump = (self.frame.width().powi(2) + self.frame.height().powi(2)).sqrt() * 0.5;
        let mut parts = Vec::new();
        let mut current: Vec<(f32, f32)> = Vec::new();
        let mut prev: Option<((f64, f64), (f32, f32))> = None;

        for &geo in points {
            match self.project(geo.0, geo.1) {
                None => {
                    flush(&mut parts, &mut current);
                    prev = None;
                }
                Some(px) => {
                    if let Some((prev_geo, prev_px)) = prev {
                        let jump = ((px.0 - prev_px.0).powi(2) + (px.1 - prev_px.1).powi(2)).sqrt();
                        if self.projection.breaks_between(prev_geo, geo) || jump > max_jump {
                            flush(&mut parts, &mut current);
                        }
                    }
                    current.push(px);
                    prev = Some((geo, px));
                }
            }
        }
        flush(&mut parts, &mut current);
        parts
    }

    /// Fill a path inside the map frame.
    pub fn fill_path(&mut self, path: &Path, color: Color, anti_alias: bool) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = anti_alias;
        self.pixmap.fill_path(
            path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            Some(&self.mask),
        );
    }

    /// Stroke a path inside the map frame.
    pub fn stroke_path(&mut self, path: &Path, color: Color, width: f32, dash: Option<&[f32]>) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let mut stroke = Stroke::default();
        stroke.width = width;
        stroke.dash = dash.and_then(|d| StrokeDash::new(d.to_vec(), 0.0));

        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), Some(&self.mask));
    }

    /// Stroke a geographic polyline, split as in [`MapCanvas::project_polyline`].
    pub fn stroke_geo_line(
        &mut self,
        points: &[(f64, f64)],
        color: Color,
        width: f32,
        dash: Option<&[f32]>,
    ) {
        let mut pb = PathBuilder::new();
        for part in self.project_polyline(points) {
            push_polyline(&mut pb, &part, false);
        }
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, color, width, dash);
        }
    }

    /// Blend a layer drawn on a same-sized pixmap onto the map.
    pub fn composite(&mut self, layer: &Pixmap, opacity: f32) {
        let paint = PixmapPaint {
            opacity,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &paint,
            Transform::identity(),
            Some(&self.mask),
        );
    }

    /// A transparent pixmap the size of the figure.
    pub fn new_layer(&self) -> RenderResult<Pixmap> {
        Pixmap::new(self.layout.width, self.layout.height).ok_or(RenderError::InvalidSize {
            width: self.layout.width,
            height: self.layout.height,
        })
    }

    /// Outline the map area.
    pub fn draw_frame(&mut self) {
        let path = PathBuilder::from_rect(self.frame);
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        let mut stroke = Stroke::default();
        stroke.width = 1.0;
        // Drawn unclipped so the outline is not cut in half
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Fill an axis-aligned rectangle outside the map clip (legend area).
    pub fn fill_rect_unclipped(&mut self, rect: Rect, color: Color) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Stroke an axis-aligned rectangle outside the map clip.
    pub fn stroke_rect_unclipped(&mut self, rect: Rect, color: Color, width: f32) {
        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        let mut stroke = Stroke::default();
        stroke.width = width;
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Draw a rendered label with its top-left corner at `(x, y)`, unclipped.
    pub fn draw_label(&mut self, label: &Pixmap, x: i32, y: i32) {
        self.pixmap.draw_pixmap(
            x,
            y,
            label.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Finish drawing and hand over the raster.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

fn flush(parts: &mut Vec<Vec<(f32, f32)>>, current: &mut Vec<(f32, f32)>) {
    if current.len() >= 2 {
        parts.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Append a polyline (or closed polygon) to a path builder.
pub(crate) fn push_polyline(pb: &mut PathBuilder, points: &[(f32, f32)], close: bool) {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return;
    };
    pb.move_to(x0, y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
}

/// Projected bounding box of an extent, by sampling it on a regular lattice.
fn projected_bounds(proj: &dyn MapProjection, extent: &Extent) -> Option<(f64, f64, f64, f64)> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for i in 0..=VIEW_SAMPLES {
        let lat = extent.min_lat + extent.lat_span() * i as f64 / VIEW_SAMPLES as f64;
        for j in 0..=VIEW_SAMPLES {
            let lon = extent.min_lon + extent.lon_span() * j as f64 / VIEW_SAMPLES as f64;
            let Some((x, y)) = proj.forward(lon, lat) else {
                continue;
            };
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_fits_inside_area() {
        let layout = FigureLayout::default();
        let canvas =
            MapCanvas::new(ProjectionKind::PlateCarree, &Extent::global(), &layout).unwrap();
        let frame = canvas.frame();
        let (ax, ay, aw, ah) = layout.map_area().unwrap();
        assert!(frame.left() >= ax as f32 - 0.5);
        assert!(frame.top() >= ay as f32 - 0.5);
        assert!(frame.right() <= (ax + aw) as f32 + 0.5);
        assert!(frame.bottom() <= (ay + ah) as f32 + 0.5);
        // Plate carrée of the globe is twice as wide as tall
        assert!((frame.width() / frame.height() - 2.0).abs() < 0.05);
    }

    #[test]
    fn test_extent_corners_land_on_frame() {
        let extent = Extent::new(-10.0, 10.0, -5.0, 5.0);
        let canvas =
            MapCanvas::new(ProjectionKind::PlateCarree, &extent, &FigureLayout::default()).unwrap();
        let (x, y) = canvas.project(-10.0, 5.0).unwrap();
        assert!((x - canvas.frame().left()).abs() < 0.5);
        assert!((y - canvas.frame().top()).abs() < 0.5);
    }

    #[test]
    fn test_polyline_split_at_antimeridian() {
        let canvas = MapCanvas::new(
            ProjectionKind::PlateCarree,
            &Extent::global(),
            &FigureLayout::default(),
        )
        .unwrap();
        let parts = canvas.project_polyline(&[(170.0, 0.0), (179.0, 0.0), (-179.0, 0.0), (-170.0, 0.0)]);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_invisible_extent_is_an_error() {
        // The far side of the globe from an orthographic view over (0, 0)
        let extent = Extent::new(150.0, 170.0, -10.0, 10.0);
        let result = MapCanvas::new(ProjectionKind::Orthographic, &extent, &FigureLayout::default());
        assert!(matches!(result, Err(RenderError::EmptyView { .. })));
    }

    #[test]
    fn test_tiny_figure_rejected() {
        let layout = FigureLayout::new(20, 20);
        assert!(MapCanvas::new(ProjectionKind::Robinson, &Extent::global(), &layout).is_err());
    }
}
