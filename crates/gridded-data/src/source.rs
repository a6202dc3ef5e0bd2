//! The data source abstraction and the in-memory source.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{DataError, DataResult};

/// Metadata of one variable in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableInfo {
    pub name: String,
    /// Dimension names, slowest-varying first
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub units: Option<String>,
    pub description: Option<String>,
}

impl VariableInfo {
    pub fn new(name: &str, dims: &[&str], shape: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            shape: shape.to_vec(),
            units: None,
            description: None,
        }
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Variables with at least a time axis and a horizontal axis pair can be
    /// drawn on the map.
    pub fn is_plottable(&self) -> bool {
        self.rank() >= 3
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A coordinate array with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordArray {
    pub values: Vec<f64>,
    pub shape: Vec<usize>,
}

impl CoordArray {
    pub fn new(values: Vec<f64>, shape: Vec<usize>) -> Self {
        Self { values, shape }
    }

    pub fn one_d(values: Vec<f64>) -> Self {
        let len = values.len();
        Self {
            values,
            shape: vec![len],
        }
    }

    /// Length of the fastest-varying axis.
    pub fn last_dim(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    /// Trailing two axes, if there are at least two.
    pub fn trailing_2d(&self) -> Option<(usize, usize)> {
        let n = self.shape.len();
        (n >= 2).then(|| (self.shape[n - 2], self.shape[n - 1]))
    }

    /// The first `count` values, i.e. the first slab along every leading axis.
    pub fn leading_slab(&self, count: usize) -> Option<&[f64]> {
        self.values.get(..count)
    }

    /// Finite minimum and maximum.
    pub fn range(&self) -> Option<(f64, f64)> {
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

/// Latitude and longitude coordinates of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lat: CoordArray,
    pub lon: CoordArray,
}

/// Anything a dataset can be read from.
///
/// Sources are read-only; `read_slice` is called once per redraw with the
/// leading indices of the current timestep and height-step.
pub trait GriddedSource: Send {
    /// Human-readable origin of the data (path, URL or generator name).
    fn name(&self) -> &str;

    /// Metadata of every variable, in the source's own order.
    fn variables(&self) -> Vec<VariableInfo>;

    /// Latitude and longitude arrays.
    fn coordinates(&self) -> DataResult<Coordinates>;

    /// Read the hyperslab of `variable` starting at `start` with `count`
    /// elements along each axis, row-major.
    fn read_slice(&self, variable: &str, start: &[usize], count: &[usize]) -> DataResult<Vec<f32>>;
}

/// A source holding every array in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    order: Vec<String>,
    arrays: BTreeMap<String, (VariableInfo, Vec<f32>)>,
    coordinates: Coordinates,
}

impl MemorySource {
    pub fn new(name: &str, coordinates: Coordinates) -> Self {
        Self {
            name: name.to_string(),
            order: Vec::new(),
            arrays: BTreeMap::new(),
            coordinates,
        }
    }

    /// Add a variable; the data length must match the declared shape.
    pub fn add_variable(&mut self, info: VariableInfo, data: Vec<f32>) -> DataResult<()> {
        if data.len() != info.len() {
            return Err(DataError::ShapeMismatch(format!(
                "variable '{}' declares {:?} ({} values) but holds {}",
                info.name,
                info.shape,
                info.len(),
                data.len()
            )));
        }
        if !self.arrays.contains_key(&info.name) {
            self.order.push(info.name.clone());
        }
        self.arrays.insert(info.name.clone(), (info, data));
        Ok(())
    }

    pub fn with_variable(mut self, info: VariableInfo, data: Vec<f32>) -> DataResult<Self> {
        self.add_variable(info, data)?;
        Ok(self)
    }
}

impl GriddedSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> Vec<VariableInfo> {
        self.order
            .iter()
            .filter_map(|name| self.arrays.get(name).map(|(info, _)| info.clone()))
            .collect()
    }

    fn coordinates(&self) -> DataResult<Coordinates> {
        Ok(self.coordinates.clone())
    }

    fn read_slice(&self, variable: &str, start: &[usize], count: &[usize]) -> DataResult<Vec<f32>> {
        let (info, data) = self
            .arrays
            .get(variable)
            .ok_or_else(|| DataError::UnknownVariable(variable.to_string()))?;
        hyperslab(data, &info.shape, start, count)
    }
}

/// CF packing and missing-data attributes of a variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Packing {
    pub scale_factor: Option<f32>,
    pub add_offset: Option<f32>,
    /// `_FillValue` and every `missing_value` entry, matched against raw values
    pub missing: Vec<f32>,
}

impl Packing {
    /// Unpack raw values, with missing ones as NaN.
    pub fn unpack(&self, raw: Vec<f32>) -> Vec<f32> {
        let scale = self.scale_factor.unwrap_or(1.0);
        let offset = self.add_offset.unwrap_or(0.0);
        raw.into_iter()
            .map(|val| {
                if self.missing.contains(&val) {
                    f32::NAN
                } else {
                    val * scale + offset
                }
            })
            .collect()
    }
}

/// Extract a row-major hyperslab from a flat array.
pub fn hyperslab(
    data: &[f32],
    shape: &[usize],
    start: &[usize],
    count: &[usize],
) -> DataResult<Vec<f32>> {
    if start.len() != shape.len() || count.len() != shape.len() {
        return Err(DataError::ShapeMismatch(format!(
            "hyperslab of rank {}/{} on array of rank {}",
            start.len(),
            count.len(),
            shape.len()
        )));
    }
    if data.len() < shape.iter().product::<usize>() {
        return Err(DataError::ShapeMismatch(format!(
            "array of shape {:?} holds only {} values",
            shape,
            data.len()
        )));
    }
    for axis in 0..shape.len() {
        if start[axis] + count[axis] > shape[axis] {
            return Err(DataError::ShapeMismatch(format!(
                "axis {} slab {}..{} exceeds length {}",
                axis,
                start[axis],
                start[axis] + count[axis],
                shape[axis]
            )));
        }
    }

    if shape.is_empty() {
        return Ok(data.iter().take(1).copied().collect());
    }

    let total: usize = count.iter().product();
    let mut out = Vec::with_capacity(total);
    if total == 0 {
        return Ok(out);
    }

    // Row-major strides
    let mut strides = vec![1usize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }

    let rank = shape.len();
    let inner = count[rank - 1];
    let mut index = vec![0usize; rank];
    loop {
        let offset: usize = (0..rank)
            .map(|axis| (start[axis] + index[axis]) * strides[axis])
            .sum();
        out.extend_from_slice(&data[offset..offset + inner]);

        // Advance the outer axes like an odometer
        let mut axis = rank - 1;
        loop {
            if axis == 0 {
                return Ok(out);
            }
            axis -= 1;
            index[axis] += 1;
            if index[axis] < count[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
}
