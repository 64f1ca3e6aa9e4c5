//! Sparse matrix over a `SparseEntryStore`

use std::fmt;

use num_traits::Zero;
use tilemat_core::{
    check_coordinates, validate_product_shapes, validate_same_shape, Matrix, MatrixElement,
    Result,
};

use super::entry_store::{Capacity, Entries, SparseEntryStore};
use crate::dense::{write_rows, DenseMatrix};

/// Sparse matrix that stores only non-zero values
#[derive(Debug, Clone)]
pub struct SparseMatrix<T: MatrixElement> {
    rows: usize,
    cols: usize,
    store: SparseEntryStore<T>,
}

/// Byte-valued sparse matrix
pub type SparseByteMatrix = SparseMatrix<u8>;

impl<T: MatrixElement> SparseMatrix<T> {
    /// Create an empty matrix with no entry bound
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_capacity(rows, cols, Capacity::Unbounded)
    }

    /// Create an empty matrix holding at most `max_entries` non-zero values
    pub fn with_max_entries(rows: usize, cols: usize, max_entries: usize) -> Self {
        Self::with_capacity(rows, cols, Capacity::Bounded(max_entries))
    }

    /// Create an empty matrix with the given capacity policy
    pub fn with_capacity(rows: usize, cols: usize, capacity: Capacity) -> Self {
        Self {
            rows,
            cols,
            store: SparseEntryStore::with_capacity(capacity),
        }
    }

    /// Copy the non-zero values of any matrix, without an entry bound
    pub fn from_matrix<M: Matrix<Element = T> + ?Sized>(source: &M) -> Result<Self> {
        Self::from_matrix_with_capacity(source, Capacity::Unbounded)
    }

    /// Copy the non-zero values of any matrix into a bounded store
    ///
    /// Fails with `CapacityExceeded` if the source holds more non-zero
    /// values than the bound allows.
    pub fn from_matrix_with_capacity<M: Matrix<Element = T> + ?Sized>(
        source: &M,
        capacity: Capacity,
    ) -> Result<Self> {
        let (rows, cols) = source.dimensions();
        let mut matrix = Self::with_capacity(rows, cols, capacity);
        for row in 0..rows {
            for col in 0..cols {
                let value = source.get(row, col)?;
                if !value.is_zero() {
                    matrix.store.put(row, col, value)?;
                }
            }
        }
        Ok(matrix)
    }

    /// The backing entry store
    pub fn store(&self) -> &SparseEntryStore<T> {
        &self.store
    }

    /// The configured entry bound
    pub fn capacity(&self) -> Capacity {
        self.store.capacity()
    }

    /// Non-zero entries in insertion order
    pub fn entries(&self) -> Entries<'_, T> {
        self.store.iter()
    }

    /// Delete the entry at a coordinate, returning its previous value
    pub fn remove(&mut self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        Ok(self.store.remove(row, col).unwrap_or_else(T::zero))
    }

    /// Product `self * other`, visiting only the stored entries of `self`
    ///
    /// Each output element accumulates from zero in the entry insertion
    /// order of `self`.
    pub fn mtimes<M: Matrix<Element = T> + ?Sized>(&self, other: &M) -> Result<DenseMatrix<T>> {
        validate_product_shapes(self.dimensions(), other.dimensions())?;
        let right = DenseMatrix::from_matrix(other)?;
        let k = right.ncols();
        let mut out = DenseMatrix::zeros(self.rows, k)?;
        let buffer = out.as_mut_slice();

        for ((row, shared), value) in self.store.iter() {
            let Some(right_row) = right.row(shared) else { continue };
            let target = &mut buffer[row * k..(row + 1) * k];
            for (acc, &b) in target.iter_mut().zip(right_row) {
                *acc += value * b;
            }
        }
        Ok(out)
    }

    /// Element-wise sum as a new unbounded sparse matrix
    pub fn plus<M: Matrix<Element = T> + ?Sized>(&self, other: &M) -> Result<SparseMatrix<T>> {
        self.combine(other, |x, y| x + y)
    }

    /// Element-wise difference as a new unbounded sparse matrix
    pub fn minus<M: Matrix<Element = T> + ?Sized>(&self, other: &M) -> Result<SparseMatrix<T>> {
        self.combine(other, |x, y| x - y)
    }

    fn combine<M, F>(&self, other: &M, op: F) -> Result<SparseMatrix<T>>
    where
        M: Matrix<Element = T> + ?Sized,
        F: Fn(T, T) -> T,
    {
        validate_same_shape(self.dimensions(), other.dimensions())?;
        let mut out = Self::new(self.rows, self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.store
                    .put(row, col, op(self.store.get(row, col), other.get(row, col)?))?;
            }
        }
        Ok(out)
    }
}

impl<T: MatrixElement> Matrix for SparseMatrix<T> {
    type Element = T;

    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        check_coordinates(row, col, (self.rows, self.cols))?;
        Ok(self.store.get(row, col))
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_coordinates(row, col, (self.rows, self.cols))?;
        self.store.put(row, col, value)
    }

    fn nnz(&self) -> usize {
        self.store.len()
    }
}

/// Equal when the shapes match and the same coordinates hold the same
/// values; capacity and insertion order are ignored.
impl<T: MatrixElement> PartialEq for SparseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self.store.len() == other.store.len()
            && self
                .store
                .iter()
                .all(|((row, col), value)| other.store.get(row, col) == value)
    }
}

impl<T: MatrixElement> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}x{} sparse, {} entries",
            self.rows,
            self.cols,
            self.store.len()
        )?;
        write_rows(f, self.rows, self.cols, |r, c| self.store.get(r, c))
    }
}
