//! Named colormaps for filled contours and mesh plots.
//!
//! Each map is a list of evenly spaced color stops with linear interpolation
//! between them. Appending `_r` to a name reverses the map.

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

type Stops = &'static [[u8; 3]];

const VIRIDIS: Stops = &[
    [68, 1, 84], [72, 40, 120], [62, 73, 137], [49, 104, 142], [38, 130, 142],
    [31, 158, 137], [53, 183, 121], [110, 206, 88], [181, 222, 43], [253, 231, 37],
];
const PLASMA: Stops = &[
    [13, 8, 135], [70, 3, 159], [114, 1, 168], [156, 23, 158], [189, 55, 134],
    [216, 87, 107], [237, 121, 83], [251, 159, 58], [253, 202, 38], [240, 249, 33],
];
const INFERNO: Stops = &[
    [0, 0, 4], [27, 12, 65], [74, 12, 107], [120, 28, 109], [165, 44, 96],
    [207, 68, 70], [237, 105, 37], [251, 155, 6], [247, 209, 61], [252, 255, 164],
];
const MAGMA: Stops = &[
    [0, 0, 4], [24, 15, 61], [68, 15, 118], [114, 31, 129], [158, 47, 127],
    [205, 64, 113], [241, 96, 93], [253, 150, 104], [254, 202, 141], [252, 253, 191],
];
const CIVIDIS: Stops = &[
    [0, 34, 78], [18, 53, 112], [59, 73, 108], [87, 93, 109], [112, 113, 115],
    [138, 135, 121], [166, 157, 117], [196, 181, 108], [228, 207, 91], [254, 232, 56],
];
const COOLWARM: Stops = &[
    [59, 76, 192], [98, 130, 234], [141, 176, 254], [184, 208, 249], [221, 221, 221],
    [245, 196, 173], [244, 154, 123], [222, 96, 77], [180, 4, 38],
];
const BWR: Stops = &[[0, 0, 255], [255, 255, 255], [255, 0, 0]];
const SEISMIC: Stops = &[[0, 0, 76], [0, 0, 255], [255, 255, 255], [255, 0, 0], [127, 0, 0]];
const RDBU: Stops = &[
    [103, 0, 31], [178, 24, 43], [214, 96, 77], [244, 165, 130], [253, 219, 199],
    [247, 247, 247], [209, 229, 240], [146, 197, 222], [67, 147, 195], [33, 102, 172],
    [5, 48, 97],
];
const RDYLBU: Stops = &[
    [165, 0, 38], [215, 48, 39], [244, 109, 67], [253, 174, 97], [254, 224, 144],
    [255, 255, 191], [224, 243, 248], [171, 217, 233], [116, 173, 209], [69, 117, 180],
    [49, 54, 149],
];
const SPECTRAL: Stops = &[
    [158, 1, 66], [213, 62, 79], [244, 109, 67], [253, 174, 97], [254, 224, 139],
    [255, 255, 191], [230, 245, 152], [171, 221, 164], [102, 194, 165], [50, 136, 189],
    [94, 79, 162],
];
const JET: Stops = &[
    [0, 0, 128], [0, 0, 255], [0, 128, 255], [0, 255, 255], [128, 255, 128],
    [255, 255, 0], [255, 128, 0], [255, 0, 0], [128, 0, 0],
];
const RAINBOW: Stops = &[
    [128, 0, 255], [64, 98, 251], [0, 181, 235], [64, 236, 212], [128, 255, 180],
    [191, 236, 140], [255, 181, 98], [255, 98, 49], [255, 0, 0],
];
const GREYS: Stops = &[
    [255, 255, 255], [240, 240, 240], [217, 217, 217], [189, 189, 189], [150, 150, 150],
    [115, 115, 115], [82, 82, 82], [37, 37, 37], [0, 0, 0],
];
const BLUES: Stops = &[
    [247, 251, 255], [222, 235, 247], [198, 219, 239], [158, 202, 225], [107, 174, 214],
    [66, 146, 198], [33, 113, 181], [8, 81, 156], [8, 48, 107],
];
const REDS: Stops = &[
    [255, 245, 240], [254, 224, 210], [252, 187, 161], [252, 146, 114], [251, 106, 74],
    [239, 59, 44], [203, 24, 29], [165, 15, 21], [103, 0, 13],
];
const GREENS: Stops = &[
    [247, 252, 245], [229, 245, 224], [199, 233, 192], [161, 217, 155], [116, 196, 118],
    [65, 171, 93], [35, 139, 69], [0, 109, 44], [0, 68, 27],
];
const TERRAIN: Stops = &[
    [51, 51, 153], [2, 152, 250], [0, 202, 106], [129, 229, 127], [255, 255, 153],
    [191, 165, 124], [128, 92, 84], [191, 174, 169], [255, 255, 255],
];

const NAMED: [(&str, Stops); 18] = [
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("coolwarm", COOLWARM),
    ("bwr", BWR),
    ("seismic", SEISMIC),
    ("RdBu", RDBU),
    ("RdYlBu", RDYLBU),
    ("Spectral", SPECTRAL),
    ("jet", JET),
    ("rainbow", RAINBOW),
    ("Greys", GREYS),
    ("Blues", BLUES),
    ("Reds", REDS),
    ("Greens", GREENS),
    ("terrain", TERRAIN),
];

/// A resolved colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Color>,
}

impl Colormap {
    /// Look a colormap up by name, exact match first, then ignoring case.
    pub fn by_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        let (base, reversed) = match trimmed.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (trimmed, false),
        };
        let (canonical, stops) = NAMED
            .iter()
            .find(|(n, _)| *n == base)
            .or_else(|| NAMED.iter().find(|(n, _)| n.eq_ignore_ascii_case(base)))?;

        let mut stops: Vec<Color> = stops.iter().map(|[r, g, b]| Color::rgb(*r, *g, *b)).collect();
        let mut name = canonical.to_string();
        if reversed {
            stops.reverse();
            name.push_str("_r");
        }
        Some(Self { name, stops })
    }

    /// Like [`Colormap::by_name`], failing with `UnknownColormap`.
    pub fn resolve(name: &str) -> RenderResult<Self> {
        Self::by_name(name).ok_or_else(|| RenderError::UnknownColormap(name.to_string()))
    }

    /// Canonical names of every colormap (reversed variants not listed).
    pub fn names() -> Vec<&'static str> {
        NAMED.iter().map(|(n, _)| *n).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at position `t` in [0, 1].
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let pos = t * last as f32;
        let idx = (pos.floor() as usize).min(last - 1);
        interpolate_color(self.stops[idx], self.stops[idx + 1], pos - idx as f32)
    }

    /// One color per band, spread over the whole map.
    pub fn band_colors(&self, bands: usize) -> Vec<Color> {
        match bands {
            0 => Vec::new(),
            1 => vec![self.sample(0.5)],
            n => (0..n)
                .map(|i| self.sample(i as f32 / (n - 1) as f32))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255), 0.5);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_reversed_map_swaps_ends() {
        let fwd = Colormap::by_name("viridis").unwrap();
        let rev = Colormap::by_name("viridis_r").unwrap();
        assert_eq!(fwd.sample(0.0), rev.sample(1.0));
        assert_eq!(rev.name(), "viridis_r");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(Colormap::by_name("rdbu").unwrap().name(), "RdBu");
        assert!(Colormap::by_name("not-a-map").is_none());
    }

    #[test]
    fn test_band_colors_cover_ends() {
        let map = Colormap::by_name("coolwarm").unwrap();
        let colors = map.band_colors(5);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], Color::rgb(59, 76, 192));
        assert_eq!(colors[4], Color::rgb(180, 4, 38));
    }
}
