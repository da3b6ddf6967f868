//! Error types for the expression-matrix library.

use crate::data::Axis;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("{axis} name '{name}' not found")]
    NotFound { axis: Axis, name: String },

    #[error("Duplicate {axis} name '{name}'")]
    DuplicateName { axis: Axis, name: String },

    #[error("Index ({row}, {col}) out of bounds for a {rows} x {cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
