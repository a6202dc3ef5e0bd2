//! Error types shared across the viewer crates.

use thiserror::Error;

/// Result type alias using DianaError.
pub type DianaResult<T> = Result<T, DianaError>;

/// Errors raised while validating view parameters.
#[derive(Debug, Error)]
pub enum DianaError {
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown overlay: {0}")]
    UnknownOverlay(String),

    #[error("Unknown plot style: {0}")]
    UnknownPlotStyle(String),
}

impl From<serde_json::Error> for DianaError {
    fn from(err: serde_json::Error) -> Self {
        DianaError::InvalidParameter {
            param: "json".to_string(),
            message: err.to_string(),
        }
    }
}
