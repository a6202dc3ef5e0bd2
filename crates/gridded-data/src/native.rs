//! NetCDF and OPeNDAP access using the netcdf library.
//!
//! Metadata is read when the source is opened; values are read lazily, one
//! hyperslab per request, so a remote forecast is never downloaded in full.
//! libnetcdf accepts OPeNDAP URLs wherever it accepts a path when it was built
//! with DAP support.

use std::sync::Once;

use tracing::{debug, info};

use crate::error::{DataError, DataResult};
use crate::source::{CoordArray, Coordinates, GriddedSource, Packing, VariableInfo};

/// Candidate names of the latitude and longitude variables, in order of
/// preference.
const LAT_NAMES: [&str; 5] = ["latitude", "lat", "XLAT", "XLAT_M", "nav_lat"];
const LON_NAMES: [&str; 5] = ["longitude", "lon", "XLONG", "XLONG_M", "nav_lon"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully (e.g., when checking for optional attributes that
/// don't exist). Call early in `main`, before any NetCDF operation.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// A dataset read through libnetcdf from a file path or OPeNDAP URL.
pub struct NetCdfSource {
    location: String,
    file: netcdf::File,
    variables: Vec<VariableInfo>,
}

impl NetCdfSource {
    /// Open a file or URL and read its variable metadata.
    pub fn open(location: &str) -> DataResult<Self> {
        silence_hdf5_errors();

        info!(location = location, "Opening NetCDF dataset");
        let file = netcdf::open(location).map_err(|e| DataError::OpenFailed {
            source_name: location.to_string(),
            message: e.to_string(),
        })?;

        let variables: Vec<VariableInfo> = file
            .variables()
            .map(|var| {
                let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
                let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
                VariableInfo {
                    name: var.name(),
                    dims,
                    shape,
                    units: get_str_attr(&var, "units"),
                    description: get_str_attr(&var, "description")
                        .or_else(|| get_str_attr(&var, "long_name")),
                }
            })
            .collect();

        debug!(
            location = location,
            variables = variables.len(),
            "Read NetCDF metadata"
        );

        Ok(Self {
            location: location.to_string(),
            file,
            variables,
        })
    }

    fn variable(&self, name: &str) -> DataResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| DataError::UnknownVariable(name.to_string()))
    }

    /// Read a whole coordinate variable, trying each candidate name.
    fn read_coordinate(&self, candidates: &[&str]) -> DataResult<CoordArray> {
        let name = candidates
            .iter()
            .find(|name| self.file.variable(name).is_some())
            .ok_or_else(|| DataError::MissingData(format!("coordinate {}", candidates[0])))?;
        let var = self.variable(name)?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let values: Vec<f64> = var
            .get_values::<f64, _>(..)
            .map_err(|e| DataError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
        Ok(CoordArray::new(values, shape))
    }
}

impl GriddedSource for NetCdfSource {
    fn name(&self) -> &str {
        &self.location
    }

    fn variables(&self) -> Vec<VariableInfo> {
        self.variables.clone()
    }

    fn coordinates(&self) -> DataResult<Coordinates> {
        Ok(Coordinates {
            lat: self.read_coordinate(&LAT_NAMES)?,
            lon: self.read_coordinate(&LON_NAMES)?,
        })
    }

    fn read_slice(&self, variable: &str, start: &[usize], count: &[usize]) -> DataResult<Vec<f32>> {
        let var = self.variable(variable)?;
        let raw: Vec<f32> = var
            .get_values::<f32, _>((start, count))
            .map_err(|e| DataError::InvalidFormat(format!("Failed to read {}: {}", variable, e)))?;

        // Unpack and mask the way CF readers do
        let mut missing = get_f32_attrs(&var, "_FillValue");
        missing.extend(get_f32_attrs(&var, "missing_value"));
        let packing = Packing {
            scale_factor: get_f32_attr(&var, "scale_factor"),
            add_offset: get_f32_attr(&var, "add_offset"),
            missing,
        };
        Ok(packing.unpack(raw))
    }
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

/// Numeric attribute as a list; scalars give one entry.
fn get_f32_attrs(var: &netcdf::Variable, name: &str) -> Vec<f32> {
    use netcdf::AttributeValue as A;

    if !has_attr(var, name) {
        return Vec::new();
    }
    let Some(Ok(value)) = var.attribute_value(name) else {
        return Vec::new();
    };
    match value {
        A::Floats(v) => v,
        A::Doubles(v) => v.into_iter().map(|x| x as f32).collect(),
        A::Shorts(v) => v.into_iter().map(f32::from).collect(),
        A::Ushorts(v) => v.into_iter().map(f32::from).collect(),
        A::Ints(v) => v.into_iter().map(|x| x as f32).collect(),
        A::Uints(v) => v.into_iter().map(|x| x as f32).collect(),
        A::Schars(v) => v.into_iter().map(f32::from).collect(),
        A::Uchars(v) => v.into_iter().map(f32::from).collect(),
        scalar => f32::try_from(scalar).ok().into_iter().collect(),
    }
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.nc");
        let result = NetCdfSource::open(path.to_str().unwrap());
        assert!(matches!(result, Err(DataError::OpenFailed { .. })));
    }
}
