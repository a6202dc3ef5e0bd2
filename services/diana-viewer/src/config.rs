//! Viewer configuration.
//!
//! Settings come from, lowest precedence first: built-in defaults, a YAML
//! file, `DIANA_*` environment variables, then command-line flags (applied by
//! the binary).

use std::path::{Path, PathBuf};

use diana_common::{Extent, Overlay, PlotStyle, ViewState};
use gridded_data::RankPolicy;
use renderer::{BackgroundImage, Coastlines, FigureLayout, RenderResources};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ViewerError, ViewerResult};
use crate::redraw::ViewerResources;

/// The MEPS deterministic forecast on the MET Norway THREDDS server.
pub const DEFAULT_SOURCE: &str =
    "https://thredds.met.no/thredds/dodsC/mepslatest/meps_det_vc_2_5km_latest.nc";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub data: DataConfig,
    pub view: ViewDefaults,
    pub figure: FigureLayout,
    pub resources: ResourceConfig,
    pub output: OutputConfig,
}

/// Where the dataset comes from and how it is sliced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path, OPeNDAP URL, or `synthetic`
    pub source: String,
    pub rank_policy: RankPolicy,
    /// Load the dataset at startup instead of waiting for `load`
    pub load_on_start: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            rank_policy: RankPolicy::default(),
            load_on_start: false,
        }
    }
}

/// Initial view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub projection: String,
    /// `[min_lon, max_lon, min_lat, max_lat]`
    pub extent: [f64; 4],
    pub overlays: Vec<Overlay>,
    pub variable: Option<String>,
    pub levels: u32,
    /// `[min, max]` split evenly into `levels` bands; from the data when unset
    pub level_range: Option<[f32; 2]>,
    pub colormap: String,
    pub plot_style: PlotStyle,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        let state = ViewState::default();
        Self {
            projection: state.projection,
            extent: state.extent.to_array(),
            overlays: state.overlays.active(),
            variable: state.variable,
            levels: state.levels,
            level_range: state.level_range.map(|(lo, hi)| [lo, hi]),
            colormap: state.colormap,
            plot_style: state.plot_style,
        }
    }
}

/// Optional map assets. Built-in coastlines and a shaded background are
/// used when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// GeoJSON coastlines
    pub coastlines: Option<PathBuf>,
    /// Global equirectangular image for the background overlay
    pub background_image: Option<PathBuf>,
}

/// Display file and animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// PNG file replaced after every redraw
    pub display: PathBuf,
    pub frame_delay_ms: u32,
    pub loop_animation: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            display: PathBuf::from("diana.png"),
            frame_delay_ms: 200,
            loop_animation: true,
        }
    }
}

/// Environment variables read by [`ViewerConfig::apply_env`].
pub const ENV_KEYS: [&str; 11] = [
    "DIANA_SOURCE",
    "DIANA_RANK_POLICY",
    "DIANA_PROJECTION",
    "DIANA_COLORMAP",
    "DIANA_LEVELS",
    "DIANA_WIDTH",
    "DIANA_HEIGHT",
    "DIANA_DISPLAY",
    "DIANA_COASTLINES",
    "DIANA_BACKGROUND_IMAGE",
    "DIANA_FRAME_DELAY_MS",
];

impl ViewerConfig {
    pub fn from_yaml_str(text: &str) -> ViewerResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a YAML configuration file.
    pub fn load(path: &Path) -> ViewerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ViewerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> ViewerResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> ViewerResult<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply `DIANA_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> ViewerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ENV_KEYS {
            let Some(value) = lookup(key) else {
                continue;
            };
            debug!(key = key, value = %value, "Environment override");
            match key {
                "DIANA_SOURCE" => self.data.source = value,
                "DIANA_RANK_POLICY" => self.data.rank_policy = value.parse()?,
                "DIANA_PROJECTION" => self.view.projection = value,
                "DIANA_COLORMAP" => self.view.colormap = value,
                "DIANA_LEVELS" => self.view.levels = parse_number(key, &value)?,
                "DIANA_WIDTH" => self.figure.width = parse_number(key, &value)?,
                "DIANA_HEIGHT" => self.figure.height = parse_number(key, &value)?,
                "DIANA_DISPLAY" => self.output.display = PathBuf::from(value),
                "DIANA_COASTLINES" => self.resources.coastlines = Some(PathBuf::from(value)),
                "DIANA_BACKGROUND_IMAGE" => {
                    self.resources.background_image = Some(PathBuf::from(value))
                }
                "DIANA_FRAME_DELAY_MS" => self.output.frame_delay_ms = parse_number(key, &value)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// The view state the session starts from.
    pub fn initial_state(&self) -> ViewerResult<ViewState> {
        let view = &self.view;
        let mut state = ViewState {
            projection: view.projection.clone(),
            extent: Extent::from_array(view.extent),
            variable: view.variable.clone(),
            colormap: view.colormap.clone(),
            plot_style: view.plot_style,
            ..ViewState::default()
        };
        for overlay in &view.overlays {
            state.overlays.set(*overlay, true);
        }
        let levels = match view.level_range {
            Some([min, max]) => state.set_level_range(min, max, view.levels),
            None => state.set_levels(view.levels),
        };
        levels.map_err(|e| ViewerError::Config(e.to_string()))?;
        Ok(state)
    }

    /// Load the configured map assets.
    pub fn resources(&self) -> ViewerResult<ViewerResources> {
        let coastlines = match &self.resources.coastlines {
            Some(path) => Coastlines::load(path)?,
            None => Coastlines::builtin(),
        };
        let background = match &self.resources.background_image {
            Some(path) => Some(BackgroundImage::load(path)?),
            None => None,
        };
        Ok(ViewerResources {
            render: RenderResources {
                coastlines,
                background,
                layout: self.figure,
            },
            rank_policy: self.data.rank_policy,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ViewerResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ViewerError::Config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_view_state() {
        let config = ViewerConfig::default();
        let state = config.initial_state().unwrap();
        assert_eq!(state, ViewState::default());
        assert_eq!(config.data.source, DEFAULT_SOURCE);
        assert_eq!(config.output.frame_delay_ms, 200);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ViewerConfig::from_yaml_str(
            r#"
view:
  projection: Mollweide
  overlays: [coastlines, gridlines]
figure:
  width: 640
"#,
        )
        .unwrap();
        assert_eq!(config.view.projection, "Mollweide");
        assert_eq!(config.view.colormap, "coolwarm");
        assert_eq!(config.figure.width, 640);
        assert_eq!(config.figure.height, FigureLayout::default().height);

        let state = config.initial_state().unwrap();
        assert_eq!(state.overlays.active(), vec![Overlay::Coastlines, Overlay::Gridlines]);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = ViewerConfig::from_yaml_str("view:\n  levels: 4\n").unwrap();
        let env: HashMap<&str, &str> = [
            ("DIANA_LEVELS", "12"),
            ("DIANA_SOURCE", "synthetic"),
            ("DIANA_RANK_POLICY", "fixed-leading"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.view.levels, 12);
        assert_eq!(config.data.source, "synthetic");
        assert_eq!(config.data.rank_policy, RankPolicy::FixedLeading);
    }

    #[test]
    fn test_bad_env_number_rejected() {
        let mut config = ViewerConfig::default();
        let result = config.apply_env(|key| (key == "DIANA_WIDTH").then(|| "wide".to_string()));
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_sample_config_parses() {
        let config = ViewerConfig::from_yaml_str(include_str!("../config/diana.yaml")).unwrap();
        assert_eq!(config.data.source, DEFAULT_SOURCE);
        assert_eq!(config.view.overlays, vec![Overlay::Coastlines]);
        assert!(config.resources.coastlines.is_none());
        config.initial_state().unwrap();
    }

    #[test]
    fn test_zero_levels_rejected() {
        let mut config = ViewerConfig::default();
        config.view.levels = 0;
        assert!(config.initial_state().is_err());
    }

    #[test]
    fn test_level_count_above_cap_rejected() {
        let mut config = ViewerConfig::default();
        let result = config.apply_env(|key| (key == "DIANA_LEVELS").then(|| "200000000".to_string()));
        assert!(result.is_ok());
        assert!(matches!(config.initial_state(), Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_level_range_from_yaml() {
        let config =
            ViewerConfig::from_yaml_str("view:\n  levels: 20\n  level_range: [260, 280]\n").unwrap();
        let state = config.initial_state().unwrap();
        assert_eq!(state.level_range, Some((260.0, 280.0)));
        assert_eq!(state.levels, 20);

        let inverted =
            ViewerConfig::from_yaml_str("view:\n  level_range: [280, 260]\n").unwrap();
        assert!(inverted.initial_state().is_err());
    }
}
