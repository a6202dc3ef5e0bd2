//! Horizontal colorbar below the map.

use serde::Serialize;
use tiny_skia::Rect;

use crate::canvas::{FigureLayout, MapCanvas};
use crate::colormap::{Color, Colormap};
use crate::plot::DATA_OPACITY;
use crate::text::{format_level, measure, render_label};

const INK: Color = Color::rgb(0, 0, 0);
/// Space kept between neighbouring tick values (pixels)
const LABEL_GAP: f32 = 6.0;

/// What the colorbar of a figure shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub variable: String,
    pub units: Option<String>,
    pub levels: Vec<f32>,
    pub colormap: String,
}

impl Legend {
    /// Caption in the form `name [units]`.
    pub fn label(&self) -> String {
        match &self.units {
            Some(units) => format!("{} [{}]", self.variable, units),
            None => self.variable.clone(),
        }
    }
}

/// Blend a band color over white the way it appears on the map.
fn as_on_map(color: Color) -> Color {
    let blend = |c: u8| (c as f32 * DATA_OPACITY + 255.0 * (1.0 - DATA_OPACITY)).round() as u8;
    Color::rgb(blend(color.r), blend(color.g), blend(color.b))
}

/// Label font size for a layout.
fn label_size(layout: &FigureLayout) -> f32 {
    (layout.legend_height as f32 * 0.22).clamp(8.0, 16.0)
}

/// Draw the colorbar: one box per band, the boundary values below it and
/// the caption above it.
pub fn draw_colorbar(canvas: &mut MapCanvas, legend: &Legend, colormap: &Colormap) {
    let levels = &legend.levels;
    if levels.len() < 2 {
        return;
    }
    let (x, y, w, h) = canvas.layout().legend_area();
    let colors = colormap.band_colors(levels.len() - 1);
    let band_w = w / colors.len() as f32;

    for (i, color) in colors.iter().enumerate() {
        if let Some(rect) = Rect::from_xywh(x + band_w * i as f32, y, band_w, h) {
            canvas.fill_rect_unclipped(rect, as_on_map(*color));
        }
    }
    if let Some(outline) = Rect::from_xywh(x, y, w, h) {
        canvas.stroke_rect_unclipped(outline, INK, 1.0);
    }

    let size = label_size(canvas.layout());
    draw_tick_values(canvas, levels, (x, y + h), band_w, size);

    let caption = legend.label();
    let (cw, ch) = measure(&caption, size);
    if let Some(label) = render_label(&caption, size, INK) {
        let cx = x + (w - cw as f32) / 2.0;
        let cy = y - ch as f32 - 2.0;
        canvas.draw_label(&label, cx.max(0.0) as i32, cy.max(0.0) as i32);
    }
}

/// Tick marks and values under the bar. Values are thinned to every n-th
/// boundary so neighbours never overlap.
fn draw_tick_values(
    canvas: &mut MapCanvas,
    levels: &[f32],
    origin: (f32, f32),
    band_w: f32,
    size: f32,
) {
    let (x, bottom) = origin;
    let step = levels[1] - levels[0];
    let texts: Vec<String> = levels.iter().map(|v| format_level(*v, step)).collect();
    let widest = texts
        .iter()
        .map(|t| measure(t, size).0)
        .max()
        .unwrap_or(0) as f32;
    let every = ((widest + LABEL_GAP) / band_w.max(1.0)).ceil().max(1.0) as usize;
    let figure_w = canvas.layout().width as f32;

    for (i, text) in texts.iter().enumerate().step_by(every) {
        let tx = x + band_w * i as f32;
        if let Some(tick) = Rect::from_xywh(tx - 0.5, bottom, 1.0, 3.0) {
            canvas.fill_rect_unclipped(tick, INK);
        }
        let Some(label) = render_label(text, size, INK) else {
            continue;
        };
        let max_x = (figure_w - label.width() as f32).max(0.0);
        let lx = (tx - label.width() as f32 / 2.0).clamp(0.0, max_x);
        canvas.draw_label(&label, lx as i32, (bottom + 4.0) as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diana_common::Extent;
    use projection::ProjectionKind;

    fn legend(levels: Vec<f32>) -> Legend {
        Legend {
            variable: "air_temperature_2m".to_string(),
            units: Some("K".to_string()),
            levels,
            colormap: "coolwarm".to_string(),
        }
    }

    fn canvas() -> MapCanvas {
        MapCanvas::new(
            ProjectionKind::PlateCarree,
            &Extent::global(),
            &FigureLayout::default(),
        )
        .unwrap()
    }

    /// Dark pixels in a horizontal strip of the figure.
    fn ink_in_rows(canvas: &MapCanvas, top: f32, bottom: f32) -> usize {
        let pixmap = canvas.pixmap();
        let (top, bottom) = (top.max(0.0) as u32, (bottom as u32).min(pixmap.height()));
        (top..bottom)
            .flat_map(|y| (0..pixmap.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| pixmap.pixel(x, y).map_or(false, |p| p.red() < 100 && p.alpha() > 0))
            .count()
    }

    #[test]
    fn test_label_with_units() {
        let legend = Legend {
            variable: "air_temperature_2m".to_string(),
            units: Some("K".to_string()),
            levels: vec![270.0, 280.0],
            colormap: "coolwarm".to_string(),
        };
        assert_eq!(legend.label(), "air_temperature_2m [K]");
    }

    #[test]
    fn test_colorbar_ends_match_colormap() {
        let mut canvas = MapCanvas::new(
            ProjectionKind::PlateCarree,
            &Extent::global(),
            &FigureLayout::default(),
        )
        .unwrap();
        let map = Colormap::by_name("coolwarm").unwrap();
        draw_colorbar(&mut canvas, &legend(vec![0.0, 1.0, 2.0, 3.0]), &map);

        let (x, y, w, h) = canvas.layout().legend_area();
        let left = canvas
            .pixmap()
            .pixel((x + 5.0) as u32, (y + h / 2.0) as u32)
            .unwrap();
        let expected = as_on_map(Color::rgb(59, 76, 192));
        assert_eq!((left.red(), left.green(), left.blue()), (expected.r, expected.g, expected.b));

        let right = canvas
            .pixmap()
            .pixel((x + w - 5.0) as u32, (y + h / 2.0) as u32)
            .unwrap();
        let expected = as_on_map(Color::rgb(180, 4, 38));
        assert_eq!((right.red(), right.green(), right.blue()), (expected.r, expected.g, expected.b));
    }

    #[test]
    fn test_colorbar_has_values_and_caption() {
        let mut canvas = canvas();
        let (_, y, _, h) = canvas.layout().legend_area();
        let below = y + h + 4.0;
        assert_eq!(ink_in_rows(&canvas, below, below + 12.0), 0);
        assert_eq!(ink_in_rows(&canvas, y - 14.0, y - 1.0), 0);

        let map = Colormap::by_name("coolwarm").unwrap();
        draw_colorbar(&mut canvas, &legend(vec![270.0, 275.0, 280.0, 285.0]), &map);
        assert!(ink_in_rows(&canvas, below, below + 12.0) > 20);
        assert!(ink_in_rows(&canvas, y - 14.0, y - 1.0) > 20);
    }

    #[test]
    fn test_crowded_values_are_thinned() {
        let levels: Vec<f32> = (0..=100).map(|i| 100000.0 + 10.0 * i as f32).collect();
        let mut crowded = canvas();
        let map = Colormap::by_name("coolwarm").unwrap();
        draw_colorbar(&mut crowded, &legend(levels), &map);

        let (_, y, w, h) = crowded.layout().legend_area();
        let below = y + h + 4.0;
        let ink = ink_in_rows(&crowded, below, below + 12.0);
        assert!(ink > 0);
        assert!((ink as f32) < w * 12.0 * 0.5, "{} dark pixels under a {} px bar", ink, w);
    }
}
