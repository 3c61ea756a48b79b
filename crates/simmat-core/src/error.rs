//! Error types for similarity computation.

use thiserror::Error;

/// Result type alias using [`SimilarityError`].
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors raised while coercing input or computing similarities.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// Row length differs from the first row
    #[error("ragged input: row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Flat buffer does not match the requested shape
    #[error("data length {len} != n_rows {n_rows} * n_cols {n_cols}")]
    Shape {
        len: usize,
        n_rows: usize,
        n_cols: usize,
    },

    /// Cell could not be parsed as a number
    #[error("non-numeric value {value:?} at ({row}, {col})")]
    NotNumeric {
        row: usize,
        col: usize,
        value: String,
    },

    /// Infinite entry in the input
    #[error("non-finite value at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    /// Column counts of the two operands differ
    #[error("dimension mismatch: {left} vs {right} columns")]
    DimensionMismatch { left: usize, right: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimilarityError {
    /// Whether this error comes from interpreting the input as a rectangular
    /// numeric matrix.
    pub fn is_coercion(&self) -> bool {
        matches!(
            self,
            SimilarityError::Ragged { .. }
                | SimilarityError::Shape { .. }
                | SimilarityError::NotNumeric { .. }
                | SimilarityError::NonFinite { .. }
        )
    }
}
