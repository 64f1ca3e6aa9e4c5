//! Blocked dense matrix
//!
//! A `BlockMatrix` is a `BlockStore` behind the uniform `Matrix` contract,
//! plus construction helpers and layout-preserving algebra.

use std::fmt;

use num_traits::Zero;
use tilemat_core::{
    validate_same_shape, BlockLayout, BlockOrder, Matrix, MatrixElement, Result, TilematError,
};

use super::BlockStore;
use crate::dense::{write_rows, DenseMatrix};
use crate::multiply::MultiplyEngine;

/// Dense matrix stored as a grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatrix<T: MatrixElement> {
    store: BlockStore<T>,
}

impl<T: MatrixElement> BlockMatrix<T> {
    /// Create a zero matrix with square blocks
    pub fn new(rows: usize, cols: usize, block_size: usize, order: BlockOrder) -> Result<Self> {
        Ok(Self::from_layout(BlockLayout::square(rows, cols, block_size, order)?))
    }

    /// Create a zero matrix with rectangular blocks
    pub fn with_block_shape(
        rows: usize,
        cols: usize,
        block_rows: usize,
        block_cols: usize,
        order: BlockOrder,
    ) -> Result<Self> {
        Ok(Self::from_layout(BlockLayout::new(
            rows, cols, block_rows, block_cols, order,
        )?))
    }

    /// Create a zero matrix with the given tiling
    pub fn from_layout(layout: BlockLayout) -> Self {
        Self {
            store: BlockStore::new(layout),
        }
    }

    /// Wrap an existing store
    pub fn from_store(store: BlockStore<T>) -> Self {
        Self { store }
    }

    /// Build from nested rows with square blocks; all rows must have the same length
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R], block_size: usize, order: BlockOrder) -> Result<Self> {
        let dense = DenseMatrix::from_rows(rows)?;
        let (nrows, ncols) = dense.dimensions();
        Self::from_matrix_with_layout(&dense, BlockLayout::square(nrows, ncols, block_size, order)?)
    }

    /// Element-wise import of any matrix with rectangular blocks
    pub fn from_matrix<M: Matrix<Element = T> + ?Sized>(
        source: &M,
        block_rows: usize,
        block_cols: usize,
        order: BlockOrder,
    ) -> Result<Self> {
        let (rows, cols) = source.dimensions();
        Self::from_matrix_with_layout(source, BlockLayout::new(rows, cols, block_rows, block_cols, order)?)
    }

    /// Element-wise import of any matrix into the given tiling
    pub fn from_matrix_with_layout<M: Matrix<Element = T> + ?Sized>(
        source: &M,
        layout: BlockLayout,
    ) -> Result<Self> {
        if source.dimensions() != layout.dimensions() {
            return Err(TilematError::mismatch(source.dimensions(), layout.dimensions()));
        }

        let mut store = BlockStore::new(layout);
        let (rows, cols) = layout.dimensions();
        for row in 0..rows {
            for col in 0..cols {
                let value = source.get(row, col)?;
                if !value.is_plain_zero() {
                    store.set(row, col, value)?;
                }
            }
        }
        Ok(Self { store })
    }

    /// The tiling of this matrix
    pub fn layout(&self) -> &BlockLayout {
        self.store.layout()
    }

    /// Block traversal order
    pub fn block_order(&self) -> BlockOrder {
        self.store.layout().order()
    }

    /// The underlying tile store
    pub fn store(&self) -> &BlockStore<T> {
        &self.store
    }

    /// Consume into the underlying tile store
    pub fn into_store(self) -> BlockStore<T> {
        self.store
    }

    /// Copy into a matrix with a different tiling
    pub fn relayout(&self, block_rows: usize, block_cols: usize, order: BlockOrder) -> Result<Self> {
        Ok(Self {
            store: self.store.relayout(block_rows, block_cols, order)?,
        })
    }

    /// Copy into a contiguous row-major matrix
    pub fn to_dense(&self) -> Result<DenseMatrix<T>> {
        let (rows, cols) = self.dimensions();
        let mut dense = DenseMatrix::zeros(rows, cols)?;
        let buffer = dense.as_mut_slice();

        for (descriptor, tile) in self.store.tiles() {
            let Some(tile) = tile else { continue };
            for (local_row, tile_row) in tile.chunks_exact(descriptor.col_extent.max(1)).enumerate() {
                let start = (descriptor.row_start + local_row) * cols + descriptor.col_start;
                buffer[start..start + tile_row.len()].copy_from_slice(tile_row);
            }
        }
        Ok(dense)
    }

    /// Product with the default engine settings
    pub fn mtimes(&self, other: &BlockMatrix<T>) -> Result<BlockMatrix<T>> {
        MultiplyEngine::default().multiply(self, other)
    }

    /// Element-wise sum; the result keeps this matrix's tiling
    pub fn plus<M: Matrix<Element = T> + ?Sized>(&self, other: &M) -> Result<BlockMatrix<T>> {
        self.combine(other, |x, y| x + y)
    }

    /// Element-wise difference; the result keeps this matrix's tiling
    pub fn minus<M: Matrix<Element = T> + ?Sized>(&self, other: &M) -> Result<BlockMatrix<T>> {
        self.combine(other, |x, y| x - y)
    }

    fn combine<M, F>(&self, other: &M, op: F) -> Result<BlockMatrix<T>>
    where
        M: Matrix<Element = T> + ?Sized,
        F: Fn(T, T) -> T,
    {
        validate_same_shape(self.dimensions(), other.dimensions())?;
        let mut out = Self::from_layout(*self.layout());
        let (rows, cols) = self.dimensions();
        for row in 0..rows {
            for col in 0..cols {
                out.set(row, col, op(self.get(row, col)?, other.get(row, col)?))?;
            }
        }
        Ok(out)
    }
}

impl<T: MatrixElement> Matrix for BlockMatrix<T> {
    type Element = T;

    fn dimensions(&self) -> (usize, usize) {
        self.store.dimensions()
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        self.store.get(row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.store.set(row, col, value)
    }
}

impl<T: MatrixElement> fmt::Display for BlockMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.layout())?;
        let (rows, cols) = self.dimensions();
        write_rows(f, rows, cols, |r, c| self.store.get(r, c).unwrap_or_else(|_| T::zero()))
    }
}
