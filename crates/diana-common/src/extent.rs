//! Geographic map extent and the entry fields used to edit it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DianaError;

/// Largest longitude magnitude accepted for an extent bound.
pub const MAX_LONGITUDE: f64 = 360.0;

/// The lon/lat bounding box currently displayed, in degrees.
///
/// Stored in the same order the entry fields present it:
/// `[min_lon, max_lon, min_lat, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Extent {
    /// Create a new extent from its four bounds.
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// The whole globe.
    pub fn global() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    /// Build an extent from `[min_lon, max_lon, min_lat, max_lat]`.
    pub fn from_array(bounds: [f64; 4]) -> Self {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.max_lon, self.min_lat, self.max_lat]
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check the bounds are finite, ordered on both axes and within range.
    pub fn validate(&self) -> Result<(), DianaError> {
        if self.to_array().iter().any(|v| !v.is_finite()) {
            return Err(DianaError::InvalidExtent(format!(
                "{} contains a non-finite bound",
                self
            )));
        }
        if self.min_lon >= self.max_lon {
            return Err(DianaError::InvalidExtent(format!(
                "min longitude {} must be below max longitude {}",
                self.min_lon, self.max_lon
            )));
        }
        if self.min_lat >= self.max_lat {
            return Err(DianaError::InvalidExtent(format!(
                "min latitude {} must be below max latitude {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(DianaError::InvalidExtent(format!(
                "latitudes must lie within [-90, 90], got {}",
                self
            )));
        }
        if self.min_lon < -MAX_LONGITUDE || self.max_lon > MAX_LONGITUDE {
            return Err(DianaError::InvalidExtent(format!(
                "longitudes must lie within [-{m}, {m}], got {}",
                self,
                m = MAX_LONGITUDE
            )));
        }
        Ok(())
    }

    /// Check if a point is contained within this extent.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Smallest extent covering every (lon, lat) pair, ignoring non-finite values.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut extent: Option<Extent> = None;
        for (lon, lat) in points {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            extent = Some(match extent {
                None => Extent::new(lon, lon, lat, lat),
                Some(e) => Extent::new(
                    e.min_lon.min(lon),
                    e.max_lon.max(lon),
                    e.min_lat.min(lat),
                    e.max_lat.max(lat),
                ),
            });
        }
        extent
    }

    /// Read one bound by field.
    pub fn get(&self, field: ExtentField) -> f64 {
        match field {
            ExtentField::MinLon => self.min_lon,
            ExtentField::MaxLon => self.max_lon,
            ExtentField::MinLat => self.min_lat,
            ExtentField::MaxLat => self.max_lat,
        }
    }

    /// Overwrite one bound by field.
    pub fn set(&mut self, field: ExtentField, value: f64) {
        match field {
            ExtentField::MinLon => self.min_lon = value,
            ExtentField::MaxLon => self.max_lon = value,
            ExtentField::MinLat => self.min_lat = value,
            ExtentField::MaxLat => self.max_lat = value,
        }
    }

    /// Commit the text of the entry fields.
    ///
    /// Each field is parsed independently. A field that is absent or does not
    /// parse as a finite number leaves its bound untouched. Returns the fields
    /// that were rejected so the caller can report them.
    pub fn apply_entry(&mut self, entry: &ExtentEntry) -> Vec<ExtentField> {
        let mut rejected = Vec::new();
        for field in ExtentField::ALL {
            let Some(text) = entry.get(field) else {
                continue;
            };
            match parse_bound(text) {
                Some(value) => self.set(field, value),
                None => rejected.push(field),
            }
        }
        rejected
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}

fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One of the four extent entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtentField {
    MinLon,
    MaxLon,
    MinLat,
    MaxLat,
}

impl ExtentField {
    pub const ALL: [ExtentField; 4] = [
        ExtentField::MinLon,
        ExtentField::MaxLon,
        ExtentField::MinLat,
        ExtentField::MaxLat,
    ];

    /// Parse a field label such as `min-lon` or `max_lat`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().replace('_', "-").as_str() {
            "min-lon" | "minlon" => Some(ExtentField::MinLon),
            "max-lon" | "maxlon" => Some(ExtentField::MaxLon),
            "min-lat" | "minlat" => Some(ExtentField::MinLat),
            "max-lat" | "maxlat" => Some(ExtentField::MaxLat),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtentField::MinLon => "min longitude",
            ExtentField::MaxLon => "max longitude",
            ExtentField::MinLat => "min latitude",
            ExtentField::MaxLat => "max latitude",
        }
    }
}

impl fmt::Display for ExtentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw text of the extent entry fields at the moment they are committed.
///
/// `None` means the field was left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtentEntry {
    pub min_lon: Option<String>,
    pub max_lon: Option<String>,
    pub min_lat: Option<String>,
    pub max_lat: Option<String>,
}

impl ExtentEntry {
    /// Entry with all four fields filled, in `[min_lon, max_lon, min_lat, max_lat]` order.
    pub fn all(values: [&str; 4]) -> Self {
        Self {
            min_lon: Some(values[0].to_string()),
            max_lon: Some(values[1].to_string()),
            min_lat: Some(values[2].to_string()),
            max_lat: Some(values[3].to_string()),
        }
    }

    /// Entry with a single field filled.
    pub fn single(field: ExtentField, text: &str) -> Self {
        let mut entry = Self::default();
        *entry.slot(field) = Some(text.to_string());
        entry
    }

    pub fn get(&self, field: ExtentField) -> Option<&str> {
        match field {
            ExtentField::MinLon => self.min_lon.as_deref(),
            ExtentField::MaxLon => self.max_lon.as_deref(),
            ExtentField::MinLat => self.min_lat.as_deref(),
            ExtentField::MaxLat => self.max_lat.as_deref(),
        }
    }

    fn slot(&mut self, field: ExtentField) -> &mut Option<String> {
        match field {
            ExtentField::MinLon => &mut self.min_lon,
            ExtentField::MaxLon => &mut self.max_lon,
            ExtentField::MinLat => &mut self.min_lat,
            ExtentField::MaxLat => &mut self.max_lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_inverted_axes() {
        assert!(Extent::new(10.0, -10.0, -5.0, 5.0).validate().is_err());
        assert!(Extent::new(-10.0, 10.0, 5.0, 5.0).validate().is_err());
        assert!(Extent::new(-10.0, 10.0, -5.0, 5.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_latitude() {
        assert!(Extent::new(-10.0, 10.0, -95.0, 5.0).validate().is_err());
    }

    #[test]
    fn test_enclosing_skips_nan() {
        let extent =
            Extent::enclosing(vec![(5.0, 60.0), (f64::NAN, 0.0), (12.0, 71.0), (8.0, 58.5)])
                .unwrap();
        assert_eq!(extent, Extent::new(5.0, 12.0, 58.5, 71.0));
        assert!(Extent::enclosing(Vec::new()).is_none());
    }
}
