//! Error types for tilemat operations

use thiserror::Error;

/// Errors that can occur during matrix construction and arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilematError {
    /// Block size, dimensions or engine settings are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// Operand shapes are incompatible for the requested operation
    #[error("Dimension mismatch: {left_rows}x{left_cols} against {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
    /// A bounded sparse store is full and the write would add an entry
    #[error("Capacity exceeded: store is limited to {max_entries} entries")]
    CapacityExceeded { max_entries: usize },
    /// Coordinate lies outside the matrix
    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// A registered acceleration backend reported a failure
    #[error("Acceleration backend failure: {0}")]
    BackendFailure(&'static str),
}

/// Coarse classification of errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Shape,
    Capacity,
    Bounds,
    Backend,
}

impl TilematError {
    /// Build a dimension mismatch from two `(rows, cols)` shapes
    pub const fn mismatch(left: (usize, usize), right: (usize, usize)) -> Self {
        TilematError::DimensionMismatch {
            left_rows: left.0,
            left_cols: left.1,
            right_rows: right.0,
            right_cols: right.1,
        }
    }

    /// Get the category this error belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            TilematError::InvalidConfiguration(_) => ErrorCategory::Configuration,
            TilematError::DimensionMismatch { .. } => ErrorCategory::Shape,
            TilematError::CapacityExceeded { .. } => ErrorCategory::Capacity,
            TilematError::IndexOutOfBounds { .. } => ErrorCategory::Bounds,
            TilematError::BackendFailure(_) => ErrorCategory::Backend,
        }
    }
}

/// Result type for tilemat operations
pub type Result<T> = core::result::Result<T, TilematError>;
