//! Error types for map rendering.

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    /// Nothing of the requested extent is visible under the projection
    #[error("Extent {extent} is not visible in projection {projection}")]
    EmptyView { projection: String, extent: String },

    #[error("Invalid figure size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Nothing to plot: {0}")]
    EmptyPlot(String),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
