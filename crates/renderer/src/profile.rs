//! Line plot of a vertical profile: value along x, height along y.

use gridded_data::Profile;
use tiny_skia::{Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform};
use tracing::debug;

use crate::canvas::{FigureLayout, FIGURE_BACKGROUND};
use crate::colormap::Color;
use crate::contour::nice_levels;
use crate::error::{RenderError, RenderResult};
use crate::png::encode_pixmap;
use crate::text::{format_level, measure, render_label};

const INK: Color = Color::rgb(0, 0, 0);
const GRID: Color = Color::rgb(220, 220, 220);
pub const LINE: Color = Color::rgb(31, 119, 180);
/// Most ticks per axis
const TICKS: u32 = 5;

/// A rendered profile plot.
pub struct ProfilePlot {
    pixmap: Pixmap,
}

impl ProfilePlot {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        encode_pixmap(&self.pixmap)
    }
}

/// Maps data coordinates into the plot box.
struct Axes {
    x: (f32, f32),
    y: (f32, f32),
    frame: Rect,
}

impl Axes {
    fn px(&self, value: f32) -> f32 {
        let (lo, hi) = self.x;
        self.frame.left() + (value - lo) / (hi - lo) * self.frame.width()
    }

    fn py(&self, height: f32) -> f32 {
        let (lo, hi) = self.y;
        self.frame.bottom() - (height - lo) / (hi - lo) * self.frame.height()
    }
}

/// Draw `profile` as a line through its levels, bottom to top.
///
/// Levels with a missing value or height are skipped.
pub fn render_profile(profile: &Profile, layout: &FigureLayout) -> RenderResult<ProfilePlot> {
    let points: Vec<(f32, f32)> = profile
        .values
        .iter()
        .zip(&profile.heights)
        .filter(|(v, h)| v.is_finite() && h.is_finite())
        .map(|(v, h)| (*v, *h))
        .collect();
    if points.is_empty() {
        return Err(RenderError::EmptyPlot(format!(
            "profile of '{}' has no finite values",
            profile.variable
        )));
    }

    let invalid = || RenderError::InvalidSize {
        width: layout.width,
        height: layout.height,
    };
    let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(invalid)?;
    pixmap.fill(FIGURE_BACKGROUND.to_skia());

    let size = (layout.height as f32 * 0.025).clamp(9.0, 16.0);
    let margin = layout.margin as f32;
    let frame = Rect::from_ltrb(
        margin + size * 6.0,
        margin + size * 2.5,
        layout.width as f32 - margin - size,
        layout.height as f32 - margin - size * 3.5,
    )
    .filter(|r| r.width() >= 10.0 && r.height() >= 10.0)
    .ok_or_else(invalid)?;

    let (vmin, vmax) = range(points.iter().map(|p| p.0));
    let (hmin, hmax) = range(points.iter().map(|p| p.1));
    let x_ticks = nice_levels(vmin, vmax, TICKS);
    let y_ticks = nice_levels(hmin, hmax, TICKS);
    let (Some(&x0), Some(&x1), Some(&y0), Some(&y1)) =
        (x_ticks.first(), x_ticks.last(), y_ticks.first(), y_ticks.last())
    else {
        return Err(RenderError::EmptyPlot(format!(
            "profile of '{}' has no usable range",
            profile.variable
        )));
    };
    let axes = Axes {
        x: (x0, x1),
        y: (y0, y1),
        frame,
    };

    draw_grid(&mut pixmap, &axes, &x_ticks, &y_ticks, size);

    let mut pb = PathBuilder::new();
    for (i, &(v, h)) in points.iter().enumerate() {
        if i == 0 {
            pb.move_to(axes.px(v), axes.py(h));
        } else {
            pb.line_to(axes.px(v), axes.py(h));
        }
    }
    if let Some(path) = pb.finish() {
        stroke(&mut pixmap, &path, LINE, 2.0);
    }
    for &(v, h) in &points {
        if let Some(marker) = PathBuilder::from_circle(axes.px(v), axes.py(h), 2.5) {
            fill(&mut pixmap, &marker, LINE);
        }
    }
    stroke(&mut pixmap, &PathBuilder::from_rect(frame), INK, 1.0);

    let title = format!(
        "{} steps {}-{} at ({}, {})",
        profile.variable, profile.window.0, profile.window.1, profile.point.0, profile.point.1
    );
    let (tw, _) = measure(&title, size);
    label(&mut pixmap, &title, frame.left() + (frame.width() - tw as f32) / 2.0, margin, size);

    let y_label = profile.vertical.label();
    let (_, lh) = measure(&y_label, size);
    label(&mut pixmap, &y_label, margin, frame.top() - lh as f32 - 2.0, size);

    let x_label = match &profile.units {
        Some(units) => format!("{} [{}]", profile.variable, units),
        None => profile.variable.clone(),
    };
    let (xw, _) = measure(&x_label, size);
    let xl_y = frame.bottom() + size * 2.0;
    label(&mut pixmap, &x_label, frame.left() + (frame.width() - xw as f32) / 2.0, xl_y, size);

    debug!(
        variable = %profile.variable,
        levels = points.len(),
        width = layout.width,
        height = layout.height,
        "Rendered profile"
    );
    Ok(ProfilePlot { pixmap })
}

/// Light gridlines at the ticks, with the tick values outside the box.
fn draw_grid(pixmap: &mut Pixmap, axes: &Axes, x_ticks: &[f32], y_ticks: &[f32], size: f32) {
    let frame = axes.frame;
    let x_step = x_ticks.get(1).map_or(1.0, |t| t - x_ticks[0]);
    for &tick in x_ticks {
        let x = axes.px(tick);
        let mut pb = PathBuilder::new();
        pb.move_to(x, frame.top());
        pb.line_to(x, frame.bottom());
        if let Some(path) = pb.finish() {
            stroke(pixmap, &path, GRID, 1.0);
        }
        let text = format_level(tick, x_step);
        let (w, _) = measure(&text, size);
        label(pixmap, &text, x - w as f32 / 2.0, frame.bottom() + 3.0, size);
    }

    let y_step = y_ticks.get(1).map_or(1.0, |t| t - y_ticks[0]);
    for &tick in y_ticks {
        let y = axes.py(tick);
        let mut pb = PathBuilder::new();
        pb.move_to(frame.left(), y);
        pb.line_to(frame.right(), y);
        if let Some(path) = pb.finish() {
            stroke(pixmap, &path, GRID, 1.0);
        }
        let text = format_level(tick, y_step);
        let (w, h) = measure(&text, size);
        label(pixmap, &text, frame.left() - w as f32 - 4.0, y - h as f32 / 2.0, size);
    }
}

fn range(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn stroke(pixmap: &mut Pixmap, path: &Path, color: Color, width: f32) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
}

fn fill(pixmap: &mut Pixmap, path: &Path, color: Color) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    pixmap.fill_path(
        path,
        &paint,
        tiny_skia::FillRule::Winding,
        Transform::identity(),
        None,
    );
}

fn label(pixmap: &mut Pixmap, text: &str, x: f32, y: f32, size: f32) {
    if let Some(rendered) = render_label(text, size, INK) {
        pixmap.draw_pixmap(
            x.max(0.0) as i32,
            y.max(0.0) as i32,
            rendered.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}
