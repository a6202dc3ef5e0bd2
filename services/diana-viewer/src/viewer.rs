//! The viewer session: owns the view state, the dataset and the displayed
//! figure, and applies console commands to them.

use std::path::Path;

use diana_common::ViewState;
use gridded_data::{synthetic_forecast, variable_table, write_variable_table, Dataset, SYNTHETIC_NAME};
use projection::ProjectionKind;
use renderer::{render_profile, RenderedFigure};
use tracing::{debug, info, warn};

use crate::animation::{animate, GifOptions};
use crate::command::{Command, ProfileRequest, HELP};
use crate::config::ViewerConfig;
use crate::display::{write_atomic, FigureSink};
use crate::error::{ViewerError, ViewerResult};
use crate::redraw::{redraw, ViewerResources};

/// What executing a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The view changed and the display shows the new figure
    Redrawn,
    /// Input was ignored; state and display are as before
    Unchanged,
    /// Text for the user
    Message(String),
    Quit,
}

/// An interactive viewer session.
///
/// Every state change is made on a copy of the view state. The copy and its
/// figure replace the current ones only when the redraw and the display
/// update both succeed, so a failed command leaves the session as it was.
pub struct Viewer {
    state: ViewState,
    dataset: Option<Dataset>,
    resources: ViewerResources,
    figure: Option<RenderedFigure>,
    sink: Box<dyn FigureSink>,
    source: String,
    gif: GifOptions,
}

impl Viewer {
    pub fn new(
        state: ViewState,
        resources: ViewerResources,
        source: impl Into<String>,
        sink: Box<dyn FigureSink>,
    ) -> Self {
        Self {
            state,
            dataset: None,
            resources,
            figure: None,
            sink,
            source: source.into(),
            gif: GifOptions::default(),
        }
    }

    /// Build a session from configuration. Map assets are loaded here.
    pub fn from_config(config: &ViewerConfig, sink: Box<dyn FigureSink>) -> ViewerResult<Self> {
        let viewer = Self::new(
            config.initial_state()?,
            config.resources()?,
            config.data.source.clone(),
            sink,
        )
        .with_gif_options(GifOptions {
            frame_delay_ms: config.output.frame_delay_ms,
            loop_forever: config.output.loop_animation,
        });
        Ok(viewer)
    }

    pub fn with_gif_options(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// The figure on display, if anything has been drawn.
    pub fn figure(&self) -> Option<&RenderedFigure> {
        self.figure.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Redraw the current state without changing it.
    pub fn refresh(&mut self) -> ViewerResult<Outcome> {
        self.commit_with(|_| {})
    }

    /// Execute one command.
    pub fn execute(&mut self, command: Command) -> ViewerResult<Outcome> {
        debug!(command = ?command, "Executing command");
        match command {
            Command::Toggle(overlay) => self.commit_with(|state| {
                let on = state.overlays.toggle(overlay);
                debug!(overlay = %overlay, on = on, "Toggled overlay");
            }),
            Command::Project(name) => self.commit_with(|state| state.projection = name),
            Command::Plot(variable) => self.commit_with(|state| state.variable = Some(variable)),
            Command::DataExtent => {
                let Some(dataset) = &self.dataset else {
                    debug!("No dataset loaded, keeping extent");
                    return Ok(Outcome::Unchanged);
                };
                let extent = dataset.data_extent()?;
                self.commit_with(|state| state.extent = extent)
            }
            Command::Extent(entry) => self.commit_with(|state| {
                for field in state.extent.apply_entry(&entry) {
                    debug!(field = %field, text = ?entry.get(field), "Ignoring non-numeric extent entry");
                }
            }),
            Command::Levels(args) => {
                let mut next = self.state.clone();
                if apply_levels(&mut next, &args).is_none() {
                    debug!(args = ?args, "Ignoring level entry");
                    return Ok(Outcome::Unchanged);
                }
                self.commit_with(|state| *state = next)
            }
            Command::Colormap(name) => self.commit_with(|state| state.colormap = name),
            Command::Style(style) => self.commit_with(|state| state.plot_style = style),
            Command::Time(t) => self.commit_with(|state| state.timestep = t),
            Command::Height(h) => self.commit_with(|state| state.heightstep = h),
            Command::Load => self.load(),
            Command::Variables => {
                let dataset = self.require_dataset("list variables")?;
                Ok(Outcome::Message(variable_table(dataset.variables())))
            }
            Command::Describe(path) => {
                let dataset = self.require_dataset("describe")?;
                write_variable_table(&path, dataset.variables())?;
                Ok(Outcome::Message(format!(
                    "Wrote {} variable descriptions to {}",
                    dataset.variables().len(),
                    path.display()
                )))
            }
            Command::Export(path) => self.export(&path),
            Command::Animate(request) => {
                let frames = animate(
                    &self.state,
                    self.dataset.as_ref(),
                    &self.resources,
                    &request,
                    self.gif,
                )?;
                Ok(Outcome::Message(format!(
                    "Wrote {} frames to {}",
                    frames,
                    request.path.display()
                )))
            }
            Command::Profile(request) => self.profile(&request),
            Command::Status => self.status(),
            Command::Projections => {
                let names: Vec<String> = ProjectionKind::ALL
                    .iter()
                    .map(|k| {
                        if k.is_global() {
                            format!("{} (global)", k.name())
                        } else {
                            k.name().to_string()
                        }
                    })
                    .collect();
                Ok(Outcome::Message(names.join("\n")))
            }
            Command::Help => Ok(Outcome::Message(HELP.to_string())),
            Command::Quit => Ok(Outcome::Quit),
        }
    }

    /// Open the configured source. A dataset is opened at most once.
    ///
    /// The dataset is kept even when the redraw that follows fails, so the
    /// user can fix the view without loading again.
    fn load(&mut self) -> ViewerResult<Outcome> {
        if let Some(dataset) = &self.dataset {
            warn!(dataset = %dataset.name(), "Dataset already loaded, ignoring load");
            return Ok(Outcome::Message(format!(
                "Dataset '{}' is already loaded",
                dataset.name()
            )));
        }

        info!(source = %self.source, "Loading dataset");
        let dataset = open_dataset(&self.source)?;
        info!(
            dataset = %dataset.name(),
            variables = dataset.variables().len(),
            plottable = dataset.plottable_variables().len(),
            "Dataset loaded"
        );
        self.dataset = Some(dataset);
        self.refresh()
    }

    fn export(&self, path: &Path) -> ViewerResult<Outcome> {
        let figure = self.figure.as_ref().ok_or_else(|| ViewerError::NoData {
            action: "export",
            reason: "nothing has been drawn yet".to_string(),
        })?;
        let png = figure.to_png()?;
        write_atomic(path, &png)?;
        info!(path = %path.display(), bytes = png.len(), "Exported figure");
        Ok(Outcome::Message(format!("Saved {}", path.display())))
    }

    /// Write a profile plot. The view is left as it is.
    fn profile(&self, request: &ProfileRequest) -> ViewerResult<Outcome> {
        let dataset = self.require_dataset("profile")?;
        let point = (request.row, request.col);
        let mut profile =
            dataset.vertical_profile(&request.variable, (request.from, request.to), point)?;
        if request.per_litre {
            let density = dataset.air_density(request.from, point)?;
            profile = profile.per_litre(&density)?;
        }
        let plot = render_profile(&profile, &self.resources.render.layout)?;
        let png = plot.to_png()?;
        write_atomic(&request.path, &png)?;
        info!(
            variable = %request.variable,
            path = %request.path.display(),
            bytes = png.len(),
            "Wrote profile"
        );
        Ok(Outcome::Message(format!(
            "{}Saved {}",
            profile.table(),
            request.path.display()
        )))
    }

    fn status(&self) -> ViewerResult<Outcome> {
        let dataset = match &self.dataset {
            Some(dataset) => dataset.name().to_string(),
            None => format!("not loaded (source: {})", self.source),
        };
        Ok(Outcome::Message(format!(
            "dataset: {}\n{}",
            dataset,
            self.state.to_json()?
        )))
    }

    fn require_dataset(&self, action: &'static str) -> ViewerResult<&Dataset> {
        self.dataset.as_ref().ok_or_else(|| ViewerError::NoData {
            action,
            reason: "no dataset loaded, use 'load' first".to_string(),
        })
    }

    /// Apply `change` to a copy of the state, redraw, show, then commit.
    fn commit_with<F>(&mut self, change: F) -> ViewerResult<Outcome>
    where
        F: FnOnce(&mut ViewState),
    {
        let mut next = self.state.clone();
        change(&mut next);
        let figure = redraw(&next, self.dataset.as_ref(), &self.resources)?;
        self.sink.show(&figure)?;
        self.state = next;
        self.figure = Some(figure);
        Ok(Outcome::Redrawn)
    }
}

/// Apply `<n>` or `<min> <max> <n>` level entry text. `None` when the text
/// does not describe a usable set of bands.
fn apply_levels(state: &mut ViewState, args: &[String]) -> Option<()> {
    let count = |text: &str| text.trim().parse::<u32>().ok();
    match args {
        [n] => state.set_levels(count(n.as_str())?).ok(),
        [min, max, n] => {
            let min: f32 = min.trim().parse().ok()?;
            let max: f32 = max.trim().parse().ok()?;
            state.set_level_range(min, max, count(n.as_str())?).ok()
        }
        _ => None,
    }
}

/// Open a dataset by location. `synthetic` needs no file or network.
pub fn open_dataset(location: &str) -> ViewerResult<Dataset> {
    if location == SYNTHETIC_NAME {
        return Ok(Dataset::from_source(synthetic_forecast()?)?);
    }
    open_native(location)
}

#[cfg(feature = "netcdf")]
fn open_native(location: &str) -> ViewerResult<Dataset> {
    let source = gridded_data::NetCdfSource::open(location)?;
    Ok(Dataset::from_source(source)?)
}

#[cfg(not(feature = "netcdf"))]
fn open_native(location: &str) -> ViewerResult<Dataset> {
    Err(ViewerError::SourceUnavailable {
        location: location.to_string(),
        reason: "built without the 'netcdf' feature; use 'synthetic' or rebuild with --features netcdf"
            .to_string(),
    })
}
