//! Vertical profiles: one grid column of a variable averaged over a time
//! window.
//!
//! Heights come from WRF geopotential (`PH` + `PHB`) when the dataset has it,
//! otherwise from the coordinate variable of the vertical dimension, otherwise
//! the level index is used.

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{DataError, DataResult};
use crate::source::VariableInfo;

/// Standard gravity (m s-2)
pub const GRAVITY: f32 = 9.81;
/// Specific gas constant of dry air (J kg-1 K-1)
pub const DRY_AIR_R: f32 = 287.0;
/// Reference pressure of potential temperature (Pa)
const P0: f32 = 100_000.0;
/// Base state of WRF's perturbation potential temperature `T` (K)
const THETA_BASE: f32 = 300.0;
/// R / cp of dry air
const KAPPA: f32 = 2.0 / 7.0;

/// What the vertical coordinate of a profile measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VerticalAxis {
    /// Altitude in meters from geopotential
    Altitude,
    /// Values of the coordinate variable named after the vertical dimension
    Coordinate { name: String, units: Option<String> },
    /// Plain level index
    Index,
}

impl VerticalAxis {
    pub fn label(&self) -> String {
        match self {
            VerticalAxis::Altitude => "Altitude [m]".to_string(),
            VerticalAxis::Coordinate {
                name,
                units: Some(units),
            } => format!("{} [{}]", name, units),
            VerticalAxis::Coordinate { name, units: None } => name.clone(),
            VerticalAxis::Index => "level".to_string(),
        }
    }
}

/// One grid column of a variable, averaged over an inclusive time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub variable: String,
    pub units: Option<String>,
    pub window: (usize, usize),
    /// Grid point as (row, column)
    pub point: (usize, usize),
    /// Time mean per level, bottom first; NaN where every step is missing
    pub values: Vec<f32>,
    /// Vertical coordinate per level
    pub heights: Vec<f32>,
    pub vertical: VerticalAxis,
}

impl Profile {
    /// Turn a per-kilogram quantity into a per-litre one using air density
    /// per level (kg m-3).
    pub fn per_litre(mut self, density: &[f32]) -> DataResult<Self> {
        if density.len() != self.values.len() {
            return Err(DataError::ShapeMismatch(format!(
                "{} density levels for {} profile levels",
                density.len(),
                self.values.len()
            )));
        }
        for (value, rho) in self.values.iter_mut().zip(density) {
            *value *= rho / 1000.0;
        }
        self.units = Some("L-1".to_string());
        Ok(self)
    }

    /// Text table of height and value per level, bottom first.
    pub fn table(&self) -> String {
        let mut out = format!(
            "{} at ({}, {}), steps {}..{}\n{:>14} {:>14}\n",
            self.variable,
            self.point.0,
            self.point.1,
            self.window.0,
            self.window.1,
            "height",
            self.units.as_deref().unwrap_or("value")
        );
        for (h, v) in self.heights.iter().zip(&self.values) {
            out.push_str(&format!("{:>14.2} {:>14.6e}\n", h, v));
        }
        out
    }
}

impl Dataset {
    /// Time mean of `variable` over `window` (inclusive) at grid point
    /// `point`, per vertical level.
    ///
    /// The variable must be laid out `[time, level, (member,) y, x]`.
    pub fn vertical_profile(
        &self,
        variable: &str,
        window: (usize, usize),
        point: (usize, usize),
    ) -> DataResult<Profile> {
        let info = self.variable(variable)?;
        let nz = column_levels(info)?;
        let (from, to) = window;
        let column = self.read_column(info, window, point)?;
        let steps = to - from + 1;

        let values = (0..nz)
            .map(|k| {
                let (sum, n) = (0..steps)
                    .map(|s| column[s * nz + k])
                    .filter(|v| v.is_finite())
                    .fold((0.0f64, 0usize), |(sum, n), v| (sum + v as f64, n + 1));
                if n == 0 {
                    f32::NAN
                } else {
                    (sum / n as f64) as f32
                }
            })
            .collect();

        let mid = from + (to - from) / 2;
        let (heights, vertical) = self.column_heights(info, mid, point)?;
        debug!(
            variable = variable,
            from = from,
            to = to,
            row = point.0,
            col = point.1,
            levels = nz,
            "Read vertical profile"
        );

        Ok(Profile {
            variable: variable.to_string(),
            units: info.units.clone(),
            window,
            point,
            values,
            heights,
            vertical,
        })
    }

    /// Dry-air density per level (kg m-3) at timestep `t`, from WRF pressure
    /// (`P` + `PB`) and perturbation potential temperature (`T`).
    pub fn air_density(&self, t: usize, point: (usize, usize)) -> DataResult<Vec<f32>> {
        let (p, pb, theta) = match (self.variable("P"), self.variable("PB"), self.variable("T")) {
            (Ok(p), Ok(pb), Ok(theta)) => (p, pb, theta),
            _ => {
                return Err(DataError::MissingData(
                    "air density needs the P, PB and T variables".to_string(),
                ))
            }
        };
        let p = self.read_column(p, (t, t), point)?;
        let pb = self.read_column(pb, (t, t), point)?;
        let theta = self.read_column(theta, (t, t), point)?;
        if p.len() != pb.len() || p.len() != theta.len() {
            return Err(DataError::ShapeMismatch(
                "P, PB and T columns differ in length".to_string(),
            ));
        }

        Ok(p.iter()
            .zip(&pb)
            .zip(&theta)
            .map(|((p, pb), theta)| {
                let pressure = p + pb;
                let temperature = (THETA_BASE + theta) * (pressure / P0).powf(KAPPA);
                pressure / (DRY_AIR_R * temperature)
            })
            .collect())
    }

    /// Raw values of one grid column over an inclusive time window,
    /// time-major.
    fn read_column(
        &self,
        info: &VariableInfo,
        window: (usize, usize),
        point: (usize, usize),
    ) -> DataResult<Vec<f32>> {
        let nz = column_levels(info)?;
        let rank = info.rank();
        let (from, to) = window;
        let (row, col) = point;
        if from > to {
            return Err(DataError::EmptyWindow { from, to });
        }
        check_index(info, "time", to, info.shape[0])?;
        check_index(info, "y", row, info.shape[rank - 2])?;
        check_index(info, "x", col, info.shape[rank - 1])?;

        let mut start = vec![0; rank];
        start[0] = from;
        start[rank - 2] = row;
        start[rank - 1] = col;
        let mut count = vec![1; rank];
        count[0] = to - from + 1;
        count[1] = nz;

        let values = self.source().read_slice(&info.name, &start, &count)?;
        if values.len() != count[0] * nz {
            return Err(DataError::ShapeMismatch(format!(
                "column of '{}' has {} values, expected {}",
                info.name,
                values.len(),
                count[0] * nz
            )));
        }
        Ok(values)
    }

    fn column_heights(
        &self,
        info: &VariableInfo,
        t: usize,
        point: (usize, usize),
    ) -> DataResult<(Vec<f32>, VerticalAxis)> {
        let nz = info.shape[1];

        if let (Ok(ph), Ok(phb)) = (self.variable("PH"), self.variable("PHB")) {
            if ph.rank() == 4 && ph.shape[1] == nz + 1 && phb.shape == ph.shape {
                let ph = self.read_column(ph, (t, t), point)?;
                let phb = self.read_column(phb, (t, t), point)?;
                // Geopotential sits on layer faces; a level takes the face above it
                let heights = ph
                    .iter()
                    .zip(&phb)
                    .skip(1)
                    .map(|(a, b)| (a + b) / GRAVITY)
                    .collect();
                return Ok((heights, VerticalAxis::Altitude));
            }
        }

        if let Some(dim) = info.dims.get(1) {
            if let Ok(coord) = self.variable(dim) {
                if coord.shape == [nz] {
                    let heights = self.source().read_slice(dim, &[0], &[nz])?;
                    let vertical = VerticalAxis::Coordinate {
                        name: dim.clone(),
                        units: coord.units.clone(),
                    };
                    return Ok((heights, vertical));
                }
            }
        }

        Ok(((0..nz).map(|k| k as f32).collect(), VerticalAxis::Index))
    }
}

fn column_levels(info: &VariableInfo) -> DataResult<usize> {
    match info.rank() {
        4 | 5 => Ok(info.shape[1]),
        rank => Err(DataError::UnsupportedRank {
            variable: info.name.clone(),
            rank,
            policy: "profile".to_string(),
            expected: "4 or 5 axes",
        }),
    }
}

fn check_index(info: &VariableInfo, axis: &'static str, index: usize, len: usize) -> DataResult<()> {
    if index >= len {
        return Err(DataError::IndexOutOfRange {
            variable: info.name.clone(),
            axis,
            index,
            len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CoordArray, Coordinates, MemorySource};

    /// Two timesteps, three levels, a 2x2 grid; value = 10 * t + level.
    fn column_dataset() -> Dataset {
        let coords = Coordinates {
            lat: CoordArray::one_d(vec![60.0, 61.0]),
            lon: CoordArray::one_d(vec![5.0, 6.0]),
        };
        let mut data = Vec::new();
        for t in 0..2 {
            for k in 0..3 {
                for _ in 0..4 {
                    data.push((10 * t + k) as f32);
                }
            }
        }
        let source = MemorySource::new("column", coords)
            .with_variable(
                VariableInfo::new("q", &["time", "level", "lat", "lon"], &[2, 3, 2, 2]),
                data,
            )
            .unwrap();
        Dataset::from_source(source).unwrap()
    }

    #[test]
    fn test_profile_averages_window() {
        let ds = column_dataset();
        let profile = ds.vertical_profile("q", (0, 1), (1, 0)).unwrap();
        assert_eq!(profile.values, vec![5.0, 6.0, 7.0]);
        assert_eq!(profile.vertical, VerticalAxis::Index);
        assert_eq!(profile.heights, vec![0.0, 1.0, 2.0]);

        let single = ds.vertical_profile("q", (1, 1), (0, 0)).unwrap();
        assert_eq!(single.values, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_profile_window_and_point_checked() {
        let ds = column_dataset();
        assert!(matches!(
            ds.vertical_profile("q", (1, 0), (0, 0)),
            Err(DataError::EmptyWindow { from: 1, to: 0 })
        ));
        assert!(matches!(
            ds.vertical_profile("q", (0, usize::MAX), (0, 0)),
            Err(DataError::IndexOutOfRange { axis: "time", .. })
        ));
        assert!(matches!(
            ds.vertical_profile("q", (0, 1), (2, 0)),
            Err(DataError::IndexOutOfRange { axis: "y", .. })
        ));
    }

    #[test]
    fn test_per_litre_scales_by_density() {
        let ds = column_dataset();
        let profile = ds.vertical_profile("q", (0, 0), (0, 0)).unwrap();
        let converted = profile.per_litre(&[1000.0, 500.0, 2000.0]).unwrap();
        assert_eq!(converted.values, vec![0.0, 0.5, 4.0]);
        assert_eq!(converted.units.as_deref(), Some("L-1"));

        let profile = ds.vertical_profile("q", (0, 0), (0, 0)).unwrap();
        assert!(profile.per_litre(&[1.0]).is_err());
    }

    #[test]
    fn test_density_needs_wrf_variables() {
        let ds = column_dataset();
        assert!(matches!(ds.air_density(0, (0, 0)), Err(DataError::MissingData(_))));
    }
}
