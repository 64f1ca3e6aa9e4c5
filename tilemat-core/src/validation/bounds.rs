//! Coordinate and size validation
//!
//! Pure functions with no allocation, shared by every matrix type.

use crate::TilematError;

/// Validate that `(row, col)` lies inside a matrix of the given dimensions
pub const fn check_coordinates(
    row: usize,
    col: usize,
    dimensions: (usize, usize),
) -> Result<(), TilematError> {
    let (rows, cols) = dimensions;
    if row >= rows || col >= cols {
        return Err(TilematError::IndexOutOfBounds {
            row,
            col,
            rows,
            cols,
        });
    }
    Ok(())
}

/// Calculate `rows * cols` with overflow protection
///
/// Dense buffers are indexed by `usize`, so any shape whose element count
/// does not fit is rejected up front.
pub const fn checked_element_count(rows: usize, cols: usize) -> Result<usize, TilematError> {
    match rows.checked_mul(cols) {
        Some(count) => Ok(count),
        None => Err(TilematError::InvalidConfiguration(
            "matrix element count overflows usize",
        )),
    }
}

/// Validate a requested block size
pub const fn validate_block_size(block_rows: usize, block_cols: usize) -> Result<(), TilematError> {
    if block_rows == 0 {
        return Err(TilematError::InvalidConfiguration(
            "block row count must be positive",
        ));
    }
    if block_cols == 0 {
        return Err(TilematError::InvalidConfiguration(
            "block column count must be positive",
        ));
    }
    Ok(())
}
