//! Synthetic forecast data for offline use and tests.
//!
//! The fields are smooth analytic functions of position, time and level so a
//! rendered map shows recognisable structure (a travelling low, a temperature
//! gradient, a rain band) without any network access.

use crate::error::DataResult;
use crate::profile::GRAVITY;
use crate::source::{CoordArray, Coordinates, MemorySource, VariableInfo};

/// Model layer thickness of the WRF-style column variables (m)
const LAYER_DEPTH: f64 = 1500.0;

/// Name reported by the synthetic source.
pub const SYNTHETIC_NAME: &str = "synthetic";

/// Grid size and axis lengths of a synthetic forecast.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSpec {
    pub nx: usize,
    pub ny: usize,
    pub times: usize,
    pub levels: usize,
    /// South-west corner (lon, lat) in degrees
    pub origin: (f64, f64),
    /// Grid spacing in degrees
    pub spacing: f64,
}

impl Default for SyntheticSpec {
    /// A Scandinavian domain roughly like a limited-area model.
    fn default() -> Self {
        Self {
            nx: 48,
            ny: 36,
            times: 7,
            levels: 6,
            origin: (0.0, 54.0),
            spacing: 0.6,
        }
    }
}

/// The default synthetic forecast.
pub fn synthetic_forecast() -> DataResult<MemorySource> {
    synthetic_forecast_with(SyntheticSpec::default())
}

/// Build a synthetic forecast with 2-D latitude/longitude arrays and
/// variables of rank 1 to 5.
///
/// Besides the MEPS-like fields it carries a WRF-style set (`QNICE`, `PH`,
/// `PHB`, `P`, `PB`, `T`) on `bottom_top` levels for vertical profiles.
pub fn synthetic_forecast_with(spec: SyntheticSpec) -> DataResult<MemorySource> {
    let SyntheticSpec {
        nx,
        ny,
        times,
        levels,
        origin,
        spacing,
    } = spec;
    let n = nx * ny;

    // Slightly sheared grid so the coordinates are genuinely 2-D
    let mut lon = Vec::with_capacity(n);
    let mut lat = Vec::with_capacity(n);
    for row in 0..ny {
        for col in 0..nx {
            lon.push(origin.0 + col as f64 * spacing + row as f64 * spacing * 0.1);
            lat.push(origin.1 + row as f64 * spacing * 0.5);
        }
    }
    let coordinates = Coordinates {
        lat: CoordArray::new(lat.clone(), vec![ny, nx]),
        lon: CoordArray::new(lon.clone(), vec![ny, nx]),
    };

    let centre_lon = origin.0 + nx as f64 * spacing / 2.0;
    let centre_lat = origin.1 + ny as f64 * spacing / 4.0;

    let pressure = |t: usize, i: usize| -> f32 {
        // A low moving east by one degree per step
        let dx = lon[i] - (centre_lon - 8.0 + t as f64);
        let dy = lat[i] - centre_lat;
        (101325.0 - 2500.0 * (-(dx * dx + dy * dy) / 40.0).exp()) as f32
    };
    let temperature = |t: usize, k: usize, i: usize| -> f32 {
        let diurnal = 2.0 * (t as f64 * std::f64::consts::PI / 12.0).sin();
        (288.0 - 0.6 * (lat[i] - origin.1) - 6.5 * k as f64 + diurnal) as f32
    };
    let precipitation = |t: usize, i: usize| -> f32 {
        let band = lon[i] - (origin.0 + 2.0 + 3.0 * t as f64) - 0.3 * (lat[i] - origin.1);
        (t as f64 * 1.5 * (-(band * band) / 6.0).exp()) as f32
    };
    let wind = |t: usize, i: usize| -> f32 {
        let dx = lon[i] - (centre_lon - 8.0 + t as f64);
        let dy = lat[i] - centre_lat;
        let r2 = dx * dx + dy * dy;
        (18.0 * (r2 / 40.0).sqrt() * (-(r2) / 80.0).exp() + 2.0) as f32
    };

    let mut mslp = Vec::with_capacity(times * n);
    let mut t2m = Vec::with_capacity(times * n);
    let mut precip = Vec::with_capacity(times * n);
    let mut wind10 = Vec::with_capacity(times * n);
    for t in 0..times {
        for i in 0..n {
            mslp.push(pressure(t, i));
            t2m.push(temperature(t, 0, i) - 1.0);
            precip.push(precipitation(t, i));
            wind10.push(wind(t, i));
        }
    }
    let mut tml = Vec::with_capacity(times * levels * n);
    for t in 0..times {
        for k in 0..levels {
            for i in 0..n {
                tml.push(temperature(t, k, i));
            }
        }
    }

    // WRF-style columns: geopotential on layer faces, the rest at layer mid-points
    let mid = |k: usize| (k as f64 + 0.5) * LAYER_DEPTH;
    let mut qnice = Vec::with_capacity(times * levels * n);
    let mut p_pert = Vec::with_capacity(times * levels * n);
    let mut p_base = Vec::with_capacity(times * levels * n);
    let mut theta = Vec::with_capacity(times * levels * n);
    let mut ph = Vec::with_capacity(times * (levels + 1) * n);
    let mut phb = Vec::with_capacity(times * (levels + 1) * n);
    for t in 0..times {
        let growth = 1.0 + 0.1 * t as f64;
        for k in 0..levels {
            let z = mid(k);
            let layer = (-((z - 4500.0) / 2000.0).powi(2)).exp();
            for i in 0..n {
                let north = 1.0 + 0.01 * (lat[i] - origin.1);
                qnice.push((2.0e5 * layer * growth * north) as f32);
                p_pert.push((30.0 * t as f64) as f32);
                p_base.push((100_000.0 * (-z / 8000.0).exp()) as f32);
                theta.push((290.0 + 0.004 * z - 300.0) as f32);
            }
        }
        let wobble = 20.0 * (t as f64 * std::f64::consts::PI / 12.0).sin();
        for k in 0..=levels {
            for _ in 0..n {
                ph.push((GRAVITY as f64 * wobble) as f32);
                phb.push((GRAVITY as f64 * k as f64 * LAYER_DEPTH) as f32);
            }
        }
    }

    let time_values: Vec<f32> = (0..times).map(|t| t as f32).collect();
    let level_values: Vec<f32> = (0..levels).map(|k| 1000.0 - 100.0 * k as f32).collect();

    MemorySource::new(SYNTHETIC_NAME, coordinates)
        .with_variable(
            VariableInfo::new("time", &["time"], &[times])
                .with_units("hours since forecast start")
                .with_description("forecast lead time"),
            time_values,
        )?
        .with_variable(
            VariableInfo::new("pressure", &["pressure"], &[levels])
                .with_units("hPa")
                .with_description("model level"),
            level_values,
        )?
        .with_variable(
            VariableInfo::new("latitude", &["y", "x"], &[ny, nx]).with_units("degrees_north"),
            lat.iter().map(|&v| v as f32).collect(),
        )?
        .with_variable(
            VariableInfo::new("longitude", &["y", "x"], &[ny, nx]).with_units("degrees_east"),
            lon.iter().map(|&v| v as f32).collect(),
        )?
        .with_variable(
            VariableInfo::new("air_pressure_at_sea_level", &["time", "y", "x"], &[times, ny, nx])
                .with_units("Pa")
                .with_description("mean sea level pressure"),
            mslp,
        )?
        .with_variable(
            VariableInfo::new(
                "air_temperature_2m",
                &["time", "height0", "y", "x"],
                &[times, 1, ny, nx],
            )
            .with_units("K")
            .with_description("screen level temperature"),
            t2m,
        )?
        .with_variable(
            VariableInfo::new(
                "air_temperature_pl",
                &["time", "pressure", "y", "x"],
                &[times, levels, ny, nx],
            )
            .with_units("K")
            .with_description("temperature on pressure levels"),
            tml,
        )?
        .with_variable(
            VariableInfo::new(
                "precipitation_amount_acc",
                &["time", "height0", "ensemble_member", "y", "x"],
                &[times, 1, 1, ny, nx],
            )
            .with_units("kg/m^2")
            .with_description("accumulated precipitation"),
            precip,
        )?
        .with_variable(
            VariableInfo::new("wind_speed_10m", &["time", "height3", "y", "x"], &[times, 1, ny, nx])
                .with_units("m/s")
                .with_description("wind speed at 10 m"),
            wind10,
        )?
        .with_variable(
            VariableInfo::new("QNICE", &["time", "bottom_top", "y", "x"], &[times, levels, ny, nx])
                .with_units("kg-1")
                .with_description("Ice Number concentration"),
            qnice,
        )?
        .with_variable(
            VariableInfo::new("P", &["time", "bottom_top", "y", "x"], &[times, levels, ny, nx])
                .with_units("Pa")
                .with_description("perturbation pressure"),
            p_pert,
        )?
        .with_variable(
            VariableInfo::new("PB", &["time", "bottom_top", "y", "x"], &[times, levels, ny, nx])
                .with_units("Pa")
                .with_description("BASE STATE PRESSURE"),
            p_base,
        )?
        .with_variable(
            VariableInfo::new("T", &["time", "bottom_top", "y", "x"], &[times, levels, ny, nx])
                .with_units("K")
                .with_description("perturbation potential temperature (theta-t0)"),
            theta,
        )?
        .with_variable(
            VariableInfo::new(
                "PH",
                &["time", "bottom_top_stag", "y", "x"],
                &[times, levels + 1, ny, nx],
            )
            .with_units("m2 s-2")
            .with_description("perturbation geopotential"),
            ph,
        )?
        .with_variable(
            VariableInfo::new(
                "PHB",
                &["time", "bottom_top_stag", "y", "x"],
                &[times, levels + 1, ny, nx],
            )
            .with_units("m2 s-2")
            .with_description("base-state geopotential"),
            phb,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GriddedSource;

    #[test]
    fn test_default_forecast_shapes() {
        let source = synthetic_forecast().unwrap();
        let vars = source.variables();
        assert_eq!(vars[0].name, "time");
        let t = vars.iter().find(|v| v.name == "air_temperature_pl").unwrap();
        assert_eq!(t.shape, vec![7, 6, 36, 48]);
    }

    #[test]
    fn test_temperature_cools_with_height() {
        let source = synthetic_forecast().unwrap();
        let low = source
            .read_slice("air_temperature_pl", &[0, 0, 10, 10], &[1, 1, 1, 1])
            .unwrap();
        let high = source
            .read_slice("air_temperature_pl", &[0, 5, 10, 10], &[1, 1, 1, 1])
            .unwrap();
        assert!(high[0] < low[0]);
    }

    #[test]
    fn test_geopotential_on_layer_faces() {
        let source = synthetic_forecast().unwrap();
        let vars = source.variables();
        let ph = vars.iter().find(|v| v.name == "PHB").unwrap();
        let q = vars.iter().find(|v| v.name == "QNICE").unwrap();
        assert_eq!(ph.shape[1], q.shape[1] + 1);
    }
}
