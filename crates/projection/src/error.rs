//! Error types for projection lookup.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("Unknown projection: {0}")]
    UnknownProjection(String),
}
