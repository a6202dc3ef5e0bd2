//! The dataset model and horizontal slice selection.

use std::fmt;
use std::str::FromStr;

use diana_common::Extent;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::source::{Coordinates, GriddedSource, VariableInfo};

/// How the leading (non-horizontal) axes of a variable are indexed.
///
/// Forecast files disagree on how many axes precede the horizontal ones, so
/// the choice is explicit rather than guessed per file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankPolicy {
    /// Index by declared rank: 3 axes → [t, ..], 4 → [t, h, ..], 5 → [t, h, 0, ..].
    #[default]
    Declared,
    /// Always [t, h, 0, ..] whatever the rank; rank < 4 is rejected.
    FixedLeading,
}

const LEADING_AXES: [&str; 3] = ["time", "height", "member"];

impl RankPolicy {
    /// Leading indices for a variable at timestep `t` and height-step `h`.
    pub fn leading_indices(&self, info: &VariableInfo, t: usize, h: usize) -> DataResult<Vec<usize>> {
        let rank = info.rank();
        let leading = match (self, rank) {
            (RankPolicy::Declared, 3) => vec![t],
            (RankPolicy::Declared, 4) => vec![t, h],
            (RankPolicy::Declared, 5) => vec![t, h, 0],
            (RankPolicy::Declared, _) => {
                return Err(DataError::UnsupportedRank {
                    variable: info.name.clone(),
                    rank,
                    policy: self.to_string(),
                    expected: "3 to 5 axes",
                })
            }
            (RankPolicy::FixedLeading, r) if r >= 4 => vec![t, h, 0],
            (RankPolicy::FixedLeading, _) => {
                return Err(DataError::UnsupportedRank {
                    variable: info.name.clone(),
                    rank,
                    policy: self.to_string(),
                    expected: "at least 4 axes",
                })
            }
        };

        for (axis, (&index, &len)) in leading.iter().zip(&info.shape).enumerate() {
            if index >= len {
                return Err(DataError::IndexOutOfRange {
                    variable: info.name.clone(),
                    axis: LEADING_AXES[axis],
                    index,
                    len,
                });
            }
        }
        Ok(leading)
    }
}

impl FromStr for RankPolicy {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "declared" => Ok(RankPolicy::Declared),
            "fixed-leading" | "fixed" => Ok(RankPolicy::FixedLeading),
            _ => Err(DataError::UnknownRankPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for RankPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankPolicy::Declared => f.write_str("declared"),
            RankPolicy::FixedLeading => f.write_str("fixed-leading"),
        }
    }
}

/// Arrangement of the horizontal points of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// A structured grid, row-major with `ny` rows of `nx` points.
    Grid { nx: usize, ny: usize },
    /// Unstructured points.
    Points,
}

/// One horizontal slice of a variable with per-point coordinates.
#[derive(Debug, Clone)]
pub struct Field {
    pub variable: String,
    pub units: Option<String>,
    pub values: Vec<f32>,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub layout: FieldLayout,
}

impl Field {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Finite value range.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// A loaded dataset: variable metadata and coordinates read once, values
/// read per slice.
pub struct Dataset {
    source: Box<dyn GriddedSource>,
    variables: Vec<VariableInfo>,
    coordinates: Coordinates,
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("source", &self.source.name())
            .field("variables", &self.variables.len())
            .finish()
    }
}

impl Dataset {
    /// Read metadata and coordinates from a source.
    pub fn open(source: Box<dyn GriddedSource>) -> DataResult<Self> {
        let variables = source.variables();
        let coordinates = source.coordinates()?;
        debug!(
            source = source.name(),
            variables = variables.len(),
            "Opened dataset"
        );
        Ok(Self {
            source,
            variables,
            coordinates,
        })
    }

    pub fn from_source<S: GriddedSource + 'static>(source: S) -> DataResult<Self> {
        Self::open(Box::new(source))
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> DataResult<&VariableInfo> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| DataError::UnknownVariable(name.to_string()))
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    /// Names of the variables that can be drawn (rank ≥ 3).
    pub fn plottable_variables(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| v.is_plottable())
            .map(|v| v.name.as_str())
            .collect()
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub(crate) fn source(&self) -> &dyn GriddedSource {
        self.source.as_ref()
    }

    /// Bounding box of the coordinate arrays.
    pub fn data_extent(&self) -> DataResult<Extent> {
        let (min_lon, max_lon) = self
            .coordinates
            .lon
            .range()
            .ok_or_else(|| DataError::MissingData("finite longitudes".to_string()))?;
        let (min_lat, max_lat) = self
            .coordinates
            .lat
            .range()
            .ok_or_else(|| DataError::MissingData("finite latitudes".to_string()))?;
        Ok(Extent::new(min_lon, max_lon, min_lat, max_lat))
    }

    /// Number of timesteps of a variable.
    pub fn time_len(&self, variable: &str) -> DataResult<usize> {
        Ok(self.variable(variable)?.shape.first().copied().unwrap_or(0))
    }

    /// Number of height-steps of a variable; 1 when it has no vertical axis.
    pub fn height_len(&self, variable: &str) -> DataResult<usize> {
        let info = self.variable(variable)?;
        Ok(if info.rank() >= 4 { info.shape[1] } else { 1 })
    }

    /// Read the horizontal slice of `variable` at timestep `t` and
    /// height-step `h`.
    pub fn horizontal_slice(
        &self,
        variable: &str,
        t: usize,
        h: usize,
        policy: RankPolicy,
    ) -> DataResult<Field> {
        let info = self.variable(variable)?;
        let leading = policy.leading_indices(info, t, h)?;
        let trailing = &info.shape[leading.len()..];

        let mut start = leading.clone();
        start.resize(info.rank(), 0);
        let mut count = vec![1; leading.len()];
        count.extend_from_slice(trailing);

        let values = self.source.read_slice(variable, &start, &count)?;
        let (lon, lat, layout) = self.horizontal_coordinates(trailing)?;
        if values.len() != lon.len() {
            return Err(DataError::ShapeMismatch(format!(
                "slice of '{}' has {} values for {} coordinates",
                variable,
                values.len(),
                lon.len()
            )));
        }

        debug!(
            variable = variable,
            t = t,
            h = h,
            policy = %policy,
            points = values.len(),
            "Read horizontal slice"
        );

        Ok(Field {
            variable: variable.to_string(),
            units: info.units.clone(),
            values,
            lon,
            lat,
            layout,
        })
    }

    /// Per-point coordinates matching the trailing axes of a slice.
    fn horizontal_coordinates(
        &self,
        trailing: &[usize],
    ) -> DataResult<(Vec<f64>, Vec<f64>, FieldLayout)> {
        let Coordinates { lat, lon } = &self.coordinates;
        match *trailing {
            [ny, nx] => {
                let n = ny * nx;
                if lat.trailing_2d() == Some((ny, nx)) && lon.trailing_2d() == Some((ny, nx)) {
                    let (lons, lats) = lon.leading_slab(n).zip(lat.leading_slab(n)).ok_or_else(
                        || DataError::ShapeMismatch("coordinate arrays too short".to_string()),
                    )?;
                    return Ok((lons.to_vec(), lats.to_vec(), FieldLayout::Grid { nx, ny }));
                }
                if lat.shape == [ny] && lon.shape == [nx] {
                    let mut lons = Vec::with_capacity(n);
                    let mut lats = Vec::with_capacity(n);
                    for &la in &lat.values {
                        for &lo in &lon.values {
                            lons.push(lo);
                            lats.push(la);
                        }
                    }
                    return Ok((lons, lats, FieldLayout::Grid { nx, ny }));
                }
                Err(DataError::ShapeMismatch(format!(
                    "grid {}x{} does not match coordinates lat {:?} lon {:?}",
                    ny, nx, lat.shape, lon.shape
                )))
            }
            [n] => {
                if lat.last_dim() == n && lon.last_dim() == n {
                    let (lons, lats) = lon.leading_slab(n).zip(lat.leading_slab(n)).ok_or_else(
                        || DataError::ShapeMismatch("coordinate arrays too short".to_string()),
                    )?;
                    return Ok((lons.to_vec(), lats.to_vec(), FieldLayout::Points));
                }
                Err(DataError::ShapeMismatch(format!(
                    "{} points do not match coordinates lat {:?} lon {:?}",
                    n, lat.shape, lon.shape
                )))
            }
            _ => Err(DataError::ShapeMismatch(format!(
                "horizontal slice must have 1 or 2 axes, got {:?}",
                trailing
            ))),
        }
    }
}
