//! Plain row-major dense matrix
//!
//! Used as the reference representation: the naive multiply path, the
//! solver and the interchange format for acceleration backends all work on
//! contiguous row-major buffers.

use std::fmt;

use tilemat_core::{
    checked_element_count, validate_product_shapes, Matrix, MatrixElement, Result, TilematError,
};

use crate::multiply::kernel;

/// Dense matrix stored as one contiguous row-major buffer
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: MatrixElement> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: MatrixElement> DenseMatrix<T> {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_element_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![T::zero(); len],
        })
    }

    /// Create an identity matrix
    pub fn identity(size: usize) -> Result<Self> {
        let mut matrix = Self::zeros(size, size)?;
        for i in 0..size {
            matrix.data[i * size + i] = T::one();
        }
        Ok(matrix)
    }

    /// Wrap an existing row-major buffer
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = checked_element_count(rows, cols)?;
        if data.len() != len {
            return Err(TilematError::InvalidConfiguration(
                "buffer length does not match matrix dimensions",
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows; all rows must have the same length
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(checked_element_count(rows.len(), cols)?);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(TilematError::InvalidConfiguration("ragged rows"));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Element-wise import of any matrix
    pub fn from_matrix<M: Matrix<Element = T> + ?Sized>(source: &M) -> Result<Self> {
        let (rows, cols) = source.dimensions();
        let mut data = Vec::with_capacity(checked_element_count(rows, cols)?);
        for row in 0..rows {
            for col in 0..cols {
                data.push(source.get(row, col)?);
            }
        }
        Ok(Self { rows, cols, data })
    }

    /// Row-major element buffer
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major element buffer
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume into the row-major element buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Transposed copy
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                data.push(self.data[row * self.cols + col]);
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Naive product `self * other` over any right operand
    ///
    /// Each output element is the dot product accumulated in increasing
    /// shared-index order from zero.
    pub fn mtimes<M: Matrix<Element = T> + ?Sized>(&self, other: &M) -> Result<DenseMatrix<T>> {
        validate_product_shapes(self.dimensions(), other.dimensions())?;
        let right = DenseMatrix::from_matrix(other)?;
        let (m, n, k) = (self.rows, self.cols, right.cols);

        let mut out = DenseMatrix::zeros(m, k)?;
        kernel::naive_multiply(&self.data, &right.data, &mut out.data, m, n, k);
        Ok(out)
    }
}

impl<T: MatrixElement> Matrix for DenseMatrix<T> {
    type Element = T;

    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_bounds(row, col)?;
        self.data[row * self.cols + col] = value;
        Ok(())
    }
}

impl<T: MatrixElement> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, self.rows, self.cols, |r, c| self.data[r * self.cols + c])
    }
}

/// Shared tabular formatting for matrix `Display` impls
pub(crate) fn write_rows<T: MatrixElement>(
    f: &mut fmt::Formatter<'_>,
    rows: usize,
    cols: usize,
    value: impl Fn(usize, usize) -> T,
) -> fmt::Result {
    for r in 0..rows {
        for c in 0..cols {
            if c > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:>10}", value(r, c))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_access() {
        let mut m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(m.dimensions(), (3, 2));
        assert_eq!(m.get(2, 1), Ok(6.0));
        m.set(0, 1, -2.0).unwrap();
        assert_eq!(m.row(0), Some(&[1.0, -2.0][..]));
        assert!(m.get(3, 0).is_err());
        assert!(m.set(0, 2, 1.0).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1, 2], vec![3]];
        assert!(matches!(
            DenseMatrix::from_rows(&rows),
            Err(TilematError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_mtimes() {
        let a = DenseMatrix::from_rows(&[[1, 2, 3], [1, 2, 4], [1, 2, 6]]).unwrap();
        let b = DenseMatrix::from_rows(&[[1], [2], [3]]).unwrap();
        let c = a.mtimes(&b).unwrap();
        assert_eq!(c, DenseMatrix::from_rows(&[[14], [17], [23]]).unwrap());

        assert!(matches!(
            b.mtimes(&a),
            Err(TilematError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_identity_and_transpose() {
        let a = DenseMatrix::from_rows(&[[1.5, 2.0, 0.0], [0.0, -1.0, 4.0]]).unwrap();
        let i = DenseMatrix::<f64>::identity(3).unwrap();
        assert_eq!(a.mtimes(&i).unwrap(), a);
        assert_eq!(a.transpose().dimensions(), (3, 2));
        assert_eq!(a.transpose().get(2, 1), Ok(4.0));
        assert_eq!(a.nnz(), 4);
    }
}
