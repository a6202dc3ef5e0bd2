//! The redraw: a pure function from view state to a new figure.
//!
//! Nothing is patched. Every call builds a blank canvas under the named
//! projection and draws every enabled overlay and the selected variable
//! again.

use diana_common::ViewState;
use gridded_data::{Dataset, RankPolicy};
use projection::ProjectionKind;
use renderer::{
    even_levels, nice_levels, render_figure, Colormap, DataLayer, FigureRequest, RenderResources,
    RenderedFigure,
};
use tracing::{debug, info};

use crate::error::ViewerResult;

/// Everything besides the view state that a redraw reads.
#[derive(Debug, Clone, Default)]
pub struct ViewerResources {
    pub render: RenderResources,
    /// How leading axes are indexed when slicing a variable
    pub rank_policy: RankPolicy,
}

/// Build the figure described by `state`.
///
/// Fails with `UnknownProjection`, `InvalidExtent` or `UnknownColormap`
/// before anything is drawn. A selected variable is drawn only when a
/// dataset is loaded; without one the data layer is skipped.
pub fn redraw(
    state: &ViewState,
    dataset: Option<&Dataset>,
    resources: &ViewerResources,
) -> ViewerResult<RenderedFigure> {
    let projection: ProjectionKind = state.projection.parse()?;
    state.extent.validate()?;
    let colormap = Colormap::resolve(&state.colormap)?;

    let field = match (&state.variable, dataset) {
        (Some(variable), Some(dataset)) => Some(dataset.horizontal_slice(
            variable,
            state.timestep,
            state.heightstep,
            resources.rank_policy,
        )?),
        (Some(variable), None) => {
            debug!(variable = %variable, "No dataset loaded, skipping data layer");
            None
        }
        (None, _) => None,
    };

    let levels = match (&field, state.level_range) {
        (Some(_), Some((lo, hi))) => even_levels(lo, hi, state.levels),
        (Some(field), None) => match field.value_range() {
            Some((lo, hi)) => nice_levels(lo, hi, state.levels),
            None => {
                info!(variable = %field.variable, "Slice has no finite values");
                Vec::new()
            }
        },
        (None, _) => Vec::new(),
    };

    let data = match &field {
        Some(field) if levels.len() >= 2 => Some(DataLayer {
            field,
            levels: &levels,
            colormap: &colormap,
            style: state.plot_style,
        }),
        _ => None,
    };

    let request = FigureRequest {
        projection,
        extent: state.extent,
        overlays: state.overlays.active(),
        data,
    };
    Ok(render_figure(&request, &resources.render)?)
}
