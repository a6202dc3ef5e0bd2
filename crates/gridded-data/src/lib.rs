//! Gridded forecast data for the diana viewer.
//!
//! A [`Dataset`] wraps any [`GriddedSource`]: an in-memory array set, the
//! synthetic forecast used offline and in tests, or (with the `netcdf`
//! feature) a NetCDF file or OPeNDAP URL. The viewer asks for one horizontal
//! slice at a time, selected by timestep and height-step, or for one grid
//! column averaged over a time window.

pub mod dataset;
pub mod describe;
pub mod error;
#[cfg(feature = "netcdf")]
pub mod native;
pub mod profile;
pub mod source;
pub mod synthetic;

pub use dataset::{Dataset, Field, FieldLayout, RankPolicy};
pub use describe::{variable_table, write_variable_table};
pub use error::{DataError, DataResult};
#[cfg(feature = "netcdf")]
pub use native::{silence_hdf5_errors, NetCdfSource};
pub use profile::{Profile, VerticalAxis};
pub use source::{CoordArray, Coordinates, GriddedSource, MemorySource, Packing, VariableInfo};
pub use synthetic::{synthetic_forecast, synthetic_forecast_with, SyntheticSpec, SYNTHETIC_NAME};
