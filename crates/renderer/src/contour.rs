//! Filled-contour geometry: level selection and band clipping.
//!
//! Filled contours are built triangle by triangle. Each grid triangle carries
//! a value at its corners; clipping it against `lo <= v <= hi` with linear
//! interpolation along the edges yields the part of the triangle inside one
//! band. Doing this for every band tiles the triangle exactly.

/// A point in 2D space (pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A polygon vertex carrying the field value at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub x: f32,
    pub y: f32,
    pub value: f32,
}

impl ValuePoint {
    pub fn new(x: f32, y: f32, value: f32) -> Self {
        Self { x, y, value }
    }

    fn lerp(self, other: ValuePoint, t: f32) -> ValuePoint {
        ValuePoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            value: self.value + (other.value - self.value) * t,
        }
    }
}

/// Band counts above this are clamped.
pub const MAX_BANDS: u32 = 100;

/// Multipliers tried for the level step within each decade.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Choose "nice" level boundaries covering `[min, max]` with at most
/// `max_bands` bands. `max_bands` is clamped to [`MAX_BANDS`].
///
/// Boundaries are multiples of 1, 2, 2.5 or 5 times a power of ten. When no
/// such step fits (very few bands over a range straddling a boundary) the
/// range is split evenly instead.
pub fn nice_levels(min: f32, max: f32, max_bands: u32) -> Vec<f32> {
    if !min.is_finite() || !max.is_finite() || max_bands == 0 {
        return Vec::new();
    }
    let max_bands = max_bands.min(MAX_BANDS);
    let (mut lo, mut hi) = (min.min(max) as f64, min.max(max) as f64);
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        // Constant field: open a small window around the value
        let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.01 };
        lo -= pad;
        hi += pad;
    }

    let bands = max_bands as f64;
    let raw_step = (hi - lo) / bands;
    let decade = 10f64.powf(raw_step.log10().floor());

    for scale in [decade, decade * 10.0] {
        for mult in NICE_STEPS {
            let step = mult * scale;
            let first = (lo / step).floor();
            let last = (hi / step).ceil();
            let count = (last - first).round();
            if count <= bands && count >= 1.0 {
                return (0..=count as usize)
                    .map(|i| ((first + i as f64) * step) as f32)
                    .collect();
            }
        }
    }

    (0..=max_bands as usize)
        .map(|i| (lo + (hi - lo) * i as f64 / bands) as f32)
        .collect()
}

/// `bands + 1` evenly spaced boundaries from `min` to `max`.
///
/// Empty when the range is not finite and increasing. `bands` is clamped to
/// [`MAX_BANDS`].
pub fn even_levels(min: f32, max: f32, bands: u32) -> Vec<f32> {
    if !min.is_finite() || !max.is_finite() || min >= max || bands == 0 {
        return Vec::new();
    }
    let bands = bands.min(MAX_BANDS);
    let (lo, hi) = (min as f64, max as f64);
    (0..=bands)
        .map(|i| (lo + (hi - lo) * i as f64 / bands as f64) as f32)
        .collect()
}

/// Band containing `value`, if it lies within the levels. The top boundary
/// belongs to the last band.
pub fn band_index(levels: &[f32], value: f32) -> Option<usize> {
    if levels.len() < 2 || !value.is_finite() {
        return None;
    }
    let bands = levels.len() - 1;
    if value < levels[0] || value > levels[bands] {
        return None;
    }
    let above = levels.partition_point(|&l| l <= value);
    Some(above.saturating_sub(1).min(bands - 1))
}

/// Keep the part of a polygon where `inside(value) >= 0`.
fn clip_half<F>(polygon: &[ValuePoint], inside: F) -> Vec<ValuePoint>
where
    F: Fn(f32) -> f32,
{
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 2);
    for i in 0..n {
        let cur = polygon[i];
        let next = polygon[(i + 1) % n];
        let dc = inside(cur.value);
        let dn = inside(next.value);
        if dc >= 0.0 {
            out.push(cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            let t = dc / (dc - dn);
            out.push(cur.lerp(next, t));
        }
    }
    out
}

/// Part of a polygon whose interpolated value lies within `[lo, hi]`.
///
/// Returns an empty vector when less than a triangle remains.
pub fn clip_band(polygon: &[ValuePoint], lo: f32, hi: f32) -> Vec<Point> {
    let above = clip_half(polygon, |v| v - lo);
    if above.len() < 3 {
        return Vec::new();
    }
    let inside = clip_half(&above, |v| hi - v);
    if inside.len() < 3 {
        return Vec::new();
    }
    inside.into_iter().map(|p| Point::new(p.x, p.y)).collect()
}

/// Bands a triangle with the given corner values can touch.
pub fn bands_spanned(levels: &[f32], values: &[f32]) -> Option<std::ops::RangeInclusive<usize>> {
    if levels.len() < 2 {
        return None;
    }
    let vmin = values.iter().copied().fold(f32::INFINITY, f32::min);
    let vmax = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let top = levels[levels.len() - 1];
    if !vmin.is_finite() || !vmax.is_finite() || vmax < levels[0] || vmin > top {
        return None;
    }
    let first = band_index(levels, vmin.max(levels[0]))?;
    let last = band_index(levels, vmax.min(top))?;
    Some(first..=last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_levels_round_numbers() {
        let levels = nice_levels(0.3, 9.7, 10);
        assert_eq!(levels.first().copied(), Some(0.0));
        assert_eq!(levels.last().copied(), Some(10.0));
        assert!(levels.len() - 1 <= 10);
    }

    #[test]
    fn test_nice_levels_cover_range() {
        for (lo, hi, n) in [(271.3, 289.9, 10), (-3.2, 4.1, 7), (101000.0, 101325.0, 5)] {
            let levels = nice_levels(lo, hi, n);
            assert!(levels[0] <= lo, "{:?}", levels);
            assert!(*levels.last().unwrap() >= hi, "{:?}", levels);
            assert!(levels.len() - 1 <= n as usize, "{:?}", levels);
            assert!(levels.windows(2).all(|w| w[1] > w[0]));
        }
    }

    #[test]
    fn test_nice_levels_single_band() {
        let levels = nice_levels(-1.0, 1.0, 1);
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn test_nice_levels_constant_field() {
        let levels = nice_levels(5.0, 5.0, 10);
        assert!(levels.len() >= 2);
        assert!(levels[0] <= 5.0 && *levels.last().unwrap() >= 5.0);
    }

    #[test]
    fn test_huge_band_count_is_clamped() {
        let levels = nice_levels(0.0, 1.0, 200_000_000);
        assert!(levels.len() <= MAX_BANDS as usize + 1);
        assert!(levels.len() >= 2);

        let levels = nice_levels(0.0, 1.0, u32::MAX);
        assert!(levels.len() <= MAX_BANDS as usize + 1);
    }

    #[test]
    fn test_even_levels() {
        let levels = even_levels(260.0, 280.0, 4);
        assert_eq!(levels, vec![260.0, 265.0, 270.0, 275.0, 280.0]);
        assert!(even_levels(1.0, 1.0, 4).is_empty());
        assert!(even_levels(0.0, f32::INFINITY, 4).is_empty());
        assert_eq!(even_levels(0.0, 1.0, u32::MAX).len(), MAX_BANDS as usize + 1);
    }

    #[test]
    fn test_band_index() {
        let levels = [0.0, 1.0, 2.0];
        assert_eq!(band_index(&levels, 0.0), Some(0));
        assert_eq!(band_index(&levels, 1.5), Some(1));
        assert_eq!(band_index(&levels, 2.0), Some(1));
        assert_eq!(band_index(&levels, 2.5), None);
        assert_eq!(band_index(&levels, f32::NAN), None);
    }

    #[test]
    fn test_clip_band_splits_triangle() {
        let tri = [
            ValuePoint::new(0.0, 0.0, 0.0),
            ValuePoint::new(10.0, 0.0, 10.0),
            ValuePoint::new(0.0, 10.0, 0.0),
        ];
        let low = clip_band(&tri, 0.0, 5.0);
        let high = clip_band(&tri, 5.0, 10.0);
        assert_eq!(low.len(), 4);
        assert_eq!(high.len(), 3);
        assert!(high.iter().all(|p| p.x >= 5.0 - 1e-4));
    }

    #[test]
    fn test_clip_band_outside_is_empty() {
        let tri = [
            ValuePoint::new(0.0, 0.0, 1.0),
            ValuePoint::new(1.0, 0.0, 2.0),
            ValuePoint::new(0.0, 1.0, 3.0),
        ];
        assert!(clip_band(&tri, 5.0, 6.0).is_empty());
    }

    #[test]
    fn test_bands_spanned() {
        let levels = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(bands_spanned(&levels, &[0.5, 2.5, 1.0]), Some(0..=2));
        assert_eq!(bands_spanned(&levels, &[4.0, 5.0, 6.0]), None);
    }
}
