//! Map figure rendering for the diana viewer.
//!
//! Draws a map under any projection of the fixed set:
//! - Background (shaded land/ocean or an equirectangular image)
//! - Filled contours, mesh cells or point markers of a field
//! - Coastlines, graticule and Tissot indicatrices
//! - A colorbar below the map
//!
//! Vertical profiles are drawn as separate line plots.
//!
//! Figures are rasterized with tiny-skia and encoded as PNG.

pub mod background;
pub mod canvas;
pub mod coastline;
pub mod colormap;
pub mod contour;
pub mod error;
pub mod figure;
pub mod legend;
pub mod overlay;
pub mod plot;
pub mod png;
pub mod profile;
pub mod text;

pub use background::BackgroundImage;
pub use canvas::{FigureLayout, MapCanvas};
pub use coastline::Coastlines;
pub use colormap::{Color, Colormap};
pub use contour::{even_levels, nice_levels};
pub use error::{RenderError, RenderResult};
pub use figure::{render_figure, DataLayer, FigureRequest, FigureSummary, RenderResources, RenderedFigure};
pub use legend::Legend;
pub use profile::{render_profile, ProfilePlot};
