//! Error types for dataset access.

use thiserror::Error;

/// Result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while opening or indexing a dataset.
#[derive(Error, Debug)]
pub enum DataError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The dataset could not be opened
    #[error("Failed to open dataset '{source_name}': {message}")]
    OpenFailed { source_name: String, message: String },

    /// Missing required variable, dimension or coordinate
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// No variable of that name in the dataset
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A leading index is past the end of its axis
    #[error("{axis} index {index} out of range for variable '{variable}' (length {len})")]
    IndexOutOfRange {
        variable: String,
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// The variable has a rank the slicing policy cannot handle
    #[error("Variable '{variable}' has {rank} axes, {policy} slicing needs {expected}")]
    UnsupportedRank {
        variable: String,
        rank: usize,
        policy: String,
        expected: &'static str,
    },

    /// A time window whose start is after its end
    #[error("Empty time window {from}..{to}")]
    EmptyWindow { from: usize, to: usize },

    /// Coordinates do not line up with the horizontal slice
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Unknown slicing policy name
    #[error("Unknown rank policy: {0}")]
    UnknownRankPolicy(String),
}
