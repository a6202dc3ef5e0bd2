//! View state: the display toggles and view parameters replayed on every redraw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DianaError, DianaResult};
use crate::extent::Extent;

/// Most contour bands a view may ask for.
pub const MAX_LEVELS: u32 = 100;

/// A map decoration that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overlay {
    Coastlines,
    Background,
    Gridlines,
    Tissot,
}

impl Overlay {
    /// Drawing order, bottom to top.
    pub const ALL: [Overlay; 4] = [
        Overlay::Background,
        Overlay::Coastlines,
        Overlay::Gridlines,
        Overlay::Tissot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Overlay::Coastlines => "coastlines",
            Overlay::Background => "background",
            Overlay::Gridlines => "gridlines",
            Overlay::Tissot => "tissot",
        }
    }
}

impl FromStr for Overlay {
    type Err = DianaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coast" | "coastlines" => Ok(Overlay::Coastlines),
            "background" | "stock" | "stock_img" => Ok(Overlay::Background),
            "grid" | "gridlines" => Ok(Overlay::Gridlines),
            "tissot" => Ok(Overlay::Tissot),
            _ => Err(DianaError::UnknownOverlay(s.to_string())),
        }
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four independent overlay flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlaySet {
    pub coastlines: bool,
    pub background: bool,
    pub gridlines: bool,
    pub tissot: bool,
}

impl OverlaySet {
    pub fn is_on(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Coastlines => self.coastlines,
            Overlay::Background => self.background,
            Overlay::Gridlines => self.gridlines,
            Overlay::Tissot => self.tissot,
        }
    }

    pub fn set(&mut self, overlay: Overlay, on: bool) {
        match overlay {
            Overlay::Coastlines => self.coastlines = on,
            Overlay::Background => self.background = on,
            Overlay::Gridlines => self.gridlines = on,
            Overlay::Tissot => self.tissot = on,
        }
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, overlay: Overlay) -> bool {
        let on = !self.is_on(overlay);
        self.set(overlay, on);
        on
    }

    /// Overlays currently on, in drawing order.
    pub fn active(&self) -> Vec<Overlay> {
        Overlay::ALL
            .into_iter()
            .filter(|overlay| self.is_on(*overlay))
            .collect()
    }
}

/// How a selected variable is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    /// Filled contours between level boundaries.
    #[default]
    Filled,
    /// One colored cell per grid cell.
    Mesh,
}

impl FromStr for PlotStyle {
    type Err = DianaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "filled" | "contourf" | "tricontourf" => Ok(PlotStyle::Filled),
            "mesh" | "pcolormesh" => Ok(PlotStyle::Mesh),
            _ => Err(DianaError::UnknownPlotStyle(s.to_string())),
        }
    }
}

impl fmt::Display for PlotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotStyle::Filled => f.write_str("filled"),
            PlotStyle::Mesh => f.write_str("mesh"),
        }
    }
}

/// Everything a redraw needs to know about what the user asked to see.
///
/// The projection is kept as the name the user typed; it is resolved against
/// the fixed projection set when the figure is built, so an unknown name
/// surfaces as a redraw failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub projection: String,
    pub extent: Extent,
    pub overlays: OverlaySet,
    pub variable: Option<String>,
    pub levels: u32,
    /// Fixed `(min, max)` the bands span evenly; chosen from the data when unset
    #[serde(default)]
    pub level_range: Option<(f32, f32)>,
    pub colormap: String,
    pub timestep: usize,
    pub heightstep: usize,
    pub plot_style: PlotStyle,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            projection: "Robinson".to_string(),
            extent: Extent::global(),
            overlays: OverlaySet::default(),
            variable: None,
            levels: 10,
            level_range: None,
            colormap: "coolwarm".to_string(),
            timestep: 0,
            heightstep: 0,
            plot_style: PlotStyle::Filled,
        }
    }
}

impl ViewState {
    /// Set the band count with levels chosen from the data range.
    pub fn set_levels(&mut self, levels: u32) -> DianaResult<()> {
        check_level_count(levels)?;
        self.levels = levels;
        self.level_range = None;
        Ok(())
    }

    /// Split `[min, max]` into `levels` equal bands.
    pub fn set_level_range(&mut self, min: f32, max: f32, levels: u32) -> DianaResult<()> {
        check_level_count(levels)?;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(DianaError::InvalidParameter {
                param: "levels".to_string(),
                message: format!("range {} to {} must be finite and increasing", min, max),
            });
        }
        self.levels = levels;
        self.level_range = Some((min, max));
        Ok(())
    }

    /// Pretty JSON dump used by the `status` command.
    pub fn to_json(&self) -> DianaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_level_count(levels: u32) -> DianaResult<()> {
    if levels == 0 || levels > MAX_LEVELS {
        return Err(DianaError::InvalidParameter {
            param: "levels".to_string(),
            message: format!("must be an integer from 1 to {}", MAX_LEVELS),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_flags() {
        let mut overlays = OverlaySet::default();
        assert!(overlays.toggle(Overlay::Tissot));
        assert!(!overlays.toggle(Overlay::Tissot));
        assert_eq!(overlays, OverlaySet::default());
    }

    #[test]
    fn test_active_follows_drawing_order() {
        let mut overlays = OverlaySet::default();
        overlays.set(Overlay::Tissot, true);
        overlays.set(Overlay::Background, true);
        assert_eq!(overlays.active(), vec![Overlay::Background, Overlay::Tissot]);
    }

    #[test]
    fn test_overlay_aliases() {
        assert_eq!("coast".parse::<Overlay>().unwrap(), Overlay::Coastlines);
        assert_eq!("Grid".parse::<Overlay>().unwrap(), Overlay::Gridlines);
        assert!("rivers".parse::<Overlay>().is_err());
    }

    #[test]
    fn test_zero_levels_rejected() {
        let mut state = ViewState::default();
        assert!(state.set_levels(0).is_err());
        assert_eq!(state.levels, 10);
        state.set_levels(4).unwrap();
        assert_eq!(state.levels, 4);
    }

    #[test]
    fn test_level_count_capped() {
        let mut state = ViewState::default();
        assert!(state.set_levels(200_000_000).is_err());
        assert!(state.set_levels(MAX_LEVELS + 1).is_err());
        assert_eq!(state.levels, 10);
        state.set_levels(MAX_LEVELS).unwrap();
        assert_eq!(state.levels, MAX_LEVELS);
    }

    #[test]
    fn test_level_range() {
        let mut state = ViewState::default();
        state.set_level_range(260.0, 280.0, 20).unwrap();
        assert_eq!(state.level_range, Some((260.0, 280.0)));
        assert_eq!(state.levels, 20);

        assert!(state.set_level_range(280.0, 260.0, 20).is_err());
        assert!(state.set_level_range(f32::NAN, 260.0, 20).is_err());
        assert!(state.set_level_range(0.0, 1.0, 0).is_err());
        assert_eq!(state.level_range, Some((260.0, 280.0)));

        state.set_levels(8).unwrap();
        assert_eq!(state.level_range, None);
    }

    #[test]
    fn test_status_json_contains_fields() {
        let json = ViewState::default().to_json().unwrap();
        assert!(json.contains("\"projection\": \"Robinson\""));
        assert!(json.contains("\"colormap\": \"coolwarm\""));
    }
}
