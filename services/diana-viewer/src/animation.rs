//! Animated GIF export of a sweep over time or height.

use diana_common::ViewState;
use gridded_data::Dataset;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use renderer::RenderedFigure;
use tracing::{debug, info};

use crate::command::{AnimationAxis, AnimationRequest};
use crate::display::write_atomic;
use crate::error::{ViewerError, ViewerResult};
use crate::redraw::{redraw, ViewerResources};

/// GIF timing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifOptions {
    pub frame_delay_ms: u32,
    pub loop_forever: bool,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            frame_delay_ms: 200,
            loop_forever: true,
        }
    }
}

/// Render one frame per index of the sweep.
///
/// Every frame is a full redraw of `state` with only the swept index changed.
/// Needs a loaded dataset and a selected variable; the sweep is checked
/// against the variable's axis length before anything is drawn.
pub fn render_frames(
    state: &ViewState,
    dataset: Option<&Dataset>,
    resources: &ViewerResources,
    request: &AnimationRequest,
) -> ViewerResult<Vec<RenderedFigure>> {
    let dataset = dataset.ok_or_else(|| ViewerError::NoData {
        action: "animate",
        reason: "no dataset loaded".to_string(),
    })?;
    let variable = state.variable.as_deref().ok_or_else(|| ViewerError::NoData {
        action: "animate",
        reason: "no variable selected".to_string(),
    })?;

    let Some(last) = request.last_index() else {
        return Err(ViewerError::Animation(format!(
            "empty {} range {}..{}",
            request.axis.name(),
            request.from,
            request.to
        )));
    };
    let len = match request.axis {
        AnimationAxis::Time => dataset.time_len(variable)?,
        AnimationAxis::Height => dataset.height_len(variable)?,
    };
    if last >= len {
        return Err(ViewerError::Animation(format!(
            "{} index {} out of range for '{}' (length {})",
            request.axis.name(),
            last,
            variable,
            len
        )));
    }

    let mut frames = Vec::new();
    for index in request.indices() {
        let mut frame_state = state.clone();
        match request.axis {
            AnimationAxis::Time => frame_state.timestep = index,
            AnimationAxis::Height => frame_state.heightstep = index,
        }
        frames.push(redraw(&frame_state, Some(dataset), resources)?);
        debug!(axis = request.axis.name(), index = index, "Rendered animation frame");
    }
    Ok(frames)
}

/// Encode figures as an animated GIF.
pub fn encode_gif(frames: &[RenderedFigure], options: GifOptions) -> ViewerResult<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        let repeat = if options.loop_forever {
            Repeat::Infinite
        } else {
            Repeat::Finite(0)
        };
        encoder.set_repeat(repeat)?;

        for figure in frames {
            let image = RgbaImage::from_raw(figure.width(), figure.height(), figure.rgba())
                .ok_or_else(|| ViewerError::Animation("frame buffer size mismatch".to_string()))?;
            let delay = Delay::from_numer_denom_ms(options.frame_delay_ms, 1);
            encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
        }
    }
    Ok(bytes)
}

/// Render the sweep and write it to the request's path.
pub fn animate(
    state: &ViewState,
    dataset: Option<&Dataset>,
    resources: &ViewerResources,
    request: &AnimationRequest,
    options: GifOptions,
) -> ViewerResult<usize> {
    let frames = render_frames(state, dataset, resources, request)?;
    let gif = encode_gif(&frames, options)?;
    write_atomic(&request.path, &gif)?;
    info!(
        path = %request.path.display(),
        frames = frames.len(),
        axis = request.axis.name(),
        "Wrote animation"
    );
    Ok(frames.len())
}
