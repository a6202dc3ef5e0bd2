//! Text labels rendered with an embedded monospace font.

use std::sync::OnceLock;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tiny_skia::{IntSize, Pixmap};
use tracing::warn;

use crate::colormap::Color;

/// Embedded font data - DejaVu Sans Mono
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

fn font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = Font::try_from_bytes(FONT_DATA);
        if font.is_none() {
            warn!("Failed to load font for labels");
        }
        font
    })
    .as_ref()
}

/// Width and height in pixels of `text` at `size`.
pub fn measure(text: &str, size: f32) -> (u32, u32) {
    let Some(font) = font() else {
        return (0, 0);
    };
    let scale = Scale::uniform(size);
    let (w, _) = text_size(scale, font, text);
    let v = font.v_metrics(scale);
    (w.max(0) as u32, (v.ascent - v.descent).ceil() as u32)
}

/// Rasterize `text` onto a transparent pixmap just large enough to hold it.
///
/// `None` when the text is empty or the font is unusable.
pub fn render_label(text: &str, size: f32, color: Color) -> Option<Pixmap> {
    let font = font()?;
    let (w, h) = measure(text, size);
    if w == 0 || h == 0 {
        return None;
    }
    let (w, h) = (w + 1, h + 1);
    let mut image = RgbaImage::new(w, h);
    let ink = Rgba([color.r, color.g, color.b, 255]);
    draw_text_mut(&mut image, ink, 0, 0, Scale::uniform(size), font, text);

    // Coverage blended over transparent black leaves the color premultiplied
    Pixmap::from_vec(image.into_raw(), IntSize::from_wh(w, h)?)
}

/// Format a level boundary with as many decimals as the level step needs.
pub fn format_level(value: f32, step: f32) -> String {
    let step = step.abs();
    let decimals = (0..=3)
        .find(|&d| {
            let scaled = step as f64 * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-3 * scaled.max(1.0)
        })
        .unwrap_or(3) as usize;
    // Keep "-0" off the colorbar
    let value = if value.abs() < step * 1e-3 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level_follows_step() {
        assert_eq!(format_level(270.0, 5.0), "270");
        assert_eq!(format_level(0.25, 0.25), "0.25");
        assert_eq!(format_level(1.5, 0.5), "1.5");
        assert_eq!(format_level(-0.00001, 0.5), "0.0");
        assert_eq!(format_level(101000.0, 200.0), "101000");
        assert_eq!(format_level(20.0 / 3.0, 20.0 / 3.0), "6.667");
    }

    #[test]
    fn test_label_has_ink() {
        let label = render_label("1013", 12.0, Color::rgb(0, 0, 0)).unwrap();
        let (w, _) = measure("1013", 12.0);
        assert!(label.width() > w);
        assert!(label.pixels().iter().any(|p| p.alpha() > 128));
    }

    #[test]
    fn test_empty_label() {
        assert!(render_label("", 12.0, Color::rgb(0, 0, 0)).is_none());
    }
}
