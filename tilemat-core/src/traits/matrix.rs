//! Core matrix abstraction traits
//!
//! This module defines the uniform element-access contract that every
//! dense, blocked and sparse matrix satisfies. Algebraic routines and the
//! multiply engine consume matrices only through this contract.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use num_traits::Zero;

use super::element::MatrixElement;
use crate::error::Result;
use crate::validation::check_coordinates;

/// Coordinate-addressed matrix access
///
/// Coordinates are `(row, col)` with `row < rows` and `col < cols`.
/// Reads of unset coordinates yield the additive identity.
pub trait Matrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get the element at the specified position
    fn get(&self, row: usize, col: usize) -> Result<Self::Element>;

    /// Set the element at the specified position
    fn set(&mut self, row: usize, col: usize, value: Self::Element) -> Result<()>;

    /// Number of rows
    fn nrows(&self) -> usize {
        self.dimensions().0
    }

    /// Number of columns
    fn ncols(&self) -> usize {
        self.dimensions().1
    }

    /// Check that a coordinate lies inside this matrix
    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        check_coordinates(row, col, self.dimensions())
    }

    /// Count of elements that differ from the additive identity
    fn nnz(&self) -> usize {
        let (rows, cols) = self.dimensions();
        let mut count = 0;
        for row in 0..rows {
            for col in 0..cols {
                if matches!(self.get(row, col), Ok(v) if v != Self::Element::zero()) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// Extension trait for row/column extraction (requires alloc feature)
#[cfg(feature = "alloc")]
pub trait MatrixOperations: Matrix {
    /// Get all values of a row in column order, zeros included
    fn row_values(&self, row: usize) -> Result<Vec<Self::Element>> {
        let cols = self.ncols();
        (0..cols).map(|col| self.get(row, col)).collect()
    }

    /// Get all values of a column in row order, zeros included
    fn col_values(&self, col: usize) -> Result<Vec<Self::Element>> {
        let rows = self.nrows();
        (0..rows).map(|row| self.get(row, col)).collect()
    }

    /// Copy the whole matrix into nested row vectors
    fn to_rows(&self) -> Result<Vec<Vec<Self::Element>>> {
        (0..self.nrows()).map(|row| self.row_values(row)).collect()
    }
}

#[cfg(feature = "alloc")]
impl<M: Matrix + ?Sized> MatrixOperations for M {}
