//! Figure composition: base map, data layer, overlays and colorbar, in a
//! fixed order.

use diana_common::{Extent, Overlay, PlotStyle};
use gridded_data::Field;
use projection::ProjectionKind;
use serde::Serialize;
use tiny_skia::Pixmap;
use tracing::{debug, info};

use crate::background::{draw_background, BackgroundImage};
use crate::canvas::{FigureLayout, MapCanvas};
use crate::coastline::Coastlines;
use crate::colormap::Colormap;
use crate::error::RenderResult;
use crate::legend::{draw_colorbar, Legend};
use crate::overlay::{draw_coastlines, draw_gridlines, draw_tissot};
use crate::plot::draw_field;
use crate::png::{demultiplied_rgba, encode_pixmap};

/// Assets shared by every redraw.
#[derive(Debug, Clone, Default)]
pub struct RenderResources {
    pub coastlines: Coastlines,
    pub background: Option<BackgroundImage>,
    pub layout: FigureLayout,
}

/// A field to draw and how to draw it.
#[derive(Debug, Clone, Copy)]
pub struct DataLayer<'a> {
    pub field: &'a Field,
    pub levels: &'a [f32],
    pub colormap: &'a Colormap,
    pub style: PlotStyle,
}

/// Everything one figure shows.
#[derive(Debug, Clone)]
pub struct FigureRequest<'a> {
    pub projection: ProjectionKind,
    pub extent: Extent,
    pub overlays: Vec<Overlay>,
    pub data: Option<DataLayer<'a>>,
}

/// What a rendered figure contains, without the pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSummary {
    pub projection: ProjectionKind,
    pub extent: Extent,
    pub overlays: Vec<Overlay>,
    pub legend: Option<Legend>,
}

/// A finished figure.
#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pixmap: Pixmap,
    summary: FigureSummary,
}

impl RenderedFigure {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn projection(&self) -> ProjectionKind {
        self.summary.projection
    }

    pub fn extent(&self) -> &Extent {
        &self.summary.extent
    }

    /// Overlays drawn, bottom to top.
    pub fn overlays(&self) -> &[Overlay] {
        &self.summary.overlays
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.summary.legend.as_ref()
    }

    pub fn summary(&self) -> &FigureSummary {
        &self.summary
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn rgba(&self) -> Vec<u8> {
        demultiplied_rgba(&self.pixmap)
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        encode_pixmap(&self.pixmap)
    }

    /// Whether two figures have identical pixels.
    pub fn same_pixels(&self, other: &RenderedFigure) -> bool {
        self.pixmap.width() == other.pixmap.width()
            && self.pixmap.height() == other.pixmap.height()
            && self.pixmap.data() == other.pixmap.data()
    }
}

/// Draw a figure.
///
/// Order, bottom to top: background, data layer, coastlines, gridlines,
/// Tissot indicatrices, map frame, colorbar.
pub fn render_figure(
    request: &FigureRequest<'_>,
    resources: &RenderResources,
) -> RenderResult<RenderedFigure> {
    let mut canvas = MapCanvas::new(request.projection, &request.extent, &resources.layout)?;
    let has = |overlay: Overlay| request.overlays.contains(&overlay);

    if has(Overlay::Background) {
        draw_background(
            &mut canvas,
            &resources.coastlines,
            resources.background.as_ref(),
        );
    }

    let mut legend = None;
    if let Some(data) = &request.data {
        draw_field(&mut canvas, data.field, data.levels, data.colormap, data.style)?;
        legend = Some(Legend {
            variable: data.field.variable.clone(),
            units: data.field.units.clone(),
            levels: data.levels.to_vec(),
            colormap: data.colormap.name().to_string(),
        });
    }

    if has(Overlay::Coastlines) {
        draw_coastlines(&mut canvas, &resources.coastlines);
    }
    if has(Overlay::Gridlines) {
        draw_gridlines(&mut canvas);
    }
    if has(Overlay::Tissot) {
        draw_tissot(&mut canvas);
    }
    canvas.draw_frame();

    if let (Some(data), Some(legend)) = (&request.data, &legend) {
        draw_colorbar(&mut canvas, legend, data.colormap);
    }

    let overlays: Vec<Overlay> = Overlay::ALL.into_iter().filter(|o| has(*o)).collect();
    info!(
        projection = %request.projection,
        extent = %request.extent,
        overlays = overlays.len(),
        data = legend.is_some(),
        "Rendered figure"
    );
    debug!(width = resources.layout.width, height = resources.layout.height, "Figure size");

    Ok(RenderedFigure {
        pixmap: canvas.into_pixmap(),
        summary: FigureSummary {
            projection: request.projection,
            extent: request.extent,
            overlays,
            legend,
        },
    })
}
