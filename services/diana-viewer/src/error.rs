//! Error types for the viewer.

use diana_common::DianaError;
use gridded_data::DataError;
use projection::ProjectionError;
use renderer::RenderError;
use thiserror::Error;

/// Result type alias using ViewerError.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors reported to the user. None of them end the session.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    View(#[from] DianaError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A console line that is not a valid command
    #[error("{0}")]
    Command(String),

    /// The configured data source cannot be opened by this build
    #[error("Cannot open '{location}': {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// An action needs a dataset and a selected variable
    #[error("Nothing to {action}: {reason}")]
    NoData { action: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Animation failed: {0}")]
    Animation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ViewerError {
    pub fn command(message: impl Into<String>) -> Self {
        ViewerError::Command(message.into())
    }

    /// Whether the error comes from what the user typed rather than from the
    /// data, the assets or the file system.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ViewerError::Command(_)
                | ViewerError::View(_)
                | ViewerError::Projection(ProjectionError::UnknownProjection(_))
                | ViewerError::Render(RenderError::UnknownColormap(_))
                | ViewerError::Data(DataError::UnknownVariable(_))
                | ViewerError::Data(DataError::IndexOutOfRange { .. })
                | ViewerError::Data(DataError::EmptyWindow { .. })
                | ViewerError::Animation(_)
        )
    }
}
