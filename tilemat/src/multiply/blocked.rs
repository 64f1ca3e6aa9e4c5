//! Tile-by-tile product of two blocked matrices
//!
//! For every output tile `(i, j)` the engine accumulates
//! `A[i][p] * B[p][j]` for `p = 0, 1, ...` in increasing order. Only the
//! three tiles of the current triple are touched at a time.

use rayon::prelude::*;
use tilemat_core::{
    validate_product_shapes, BlockDescriptor, BlockLayout, MatrixElement, Result,
};
use tracing::debug;

use super::kernel;
use crate::block::BlockStore;

/// Multiply two blocked stores, producing a store tiled by
/// `(a.block_rows, b.block_cols)` in `a`'s block order
///
/// When `a`'s column blocks and `b`'s row blocks have different sizes, `b`
/// is first re-tiled to match. Operand block orders never change the
/// result values.
pub fn multiply_blocked<T: MatrixElement>(
    a: &BlockStore<T>,
    b: &BlockStore<T>,
    parallel: bool,
) -> Result<BlockStore<T>> {
    validate_product_shapes(a.dimensions(), b.dimensions())?;

    let a_layout = *a.layout();
    if a_layout.block_cols() != b.layout().block_rows() {
        debug!(
            from = b.layout().block_rows(),
            to = a_layout.block_cols(),
            "re-tiling right operand to align the shared dimension"
        );
        let aligned = b.relayout(
            a_layout.block_cols(),
            b.layout().block_cols(),
            b.layout().order(),
        )?;
        return multiply_aligned(a, &aligned, parallel);
    }
    multiply_aligned(a, b, parallel)
}

fn multiply_aligned<T: MatrixElement>(
    a: &BlockStore<T>,
    b: &BlockStore<T>,
    parallel: bool,
) -> Result<BlockStore<T>> {
    let (a_layout, b_layout) = (a.layout(), b.layout());
    let out_layout = BlockLayout::new(
        a_layout.dimensions().0,
        b_layout.dimensions().1,
        a_layout.block_rows(),
        b_layout.block_cols(),
        a_layout.order(),
    )?;

    // Stand-in for tiles that were never written
    let zeros = vec![T::zero(); a_layout.max_tile_len().max(b_layout.max_tile_len())];
    let targets: Vec<BlockDescriptor> = out_layout.blocks().collect();

    let tiles: Vec<Box<[T]>> = if parallel {
        targets
            .par_iter()
            .map(|target| compute_tile(a, b, target, &zeros))
            .collect()
    } else {
        targets
            .iter()
            .map(|target| compute_tile(a, b, target, &zeros))
            .collect()
    };

    Ok(BlockStore::from_tiles(out_layout, tiles))
}

/// Accumulate one output tile over the shared block index in increasing order
fn compute_tile<T: MatrixElement>(
    a: &BlockStore<T>,
    b: &BlockStore<T>,
    target: &BlockDescriptor,
    zeros: &[T],
) -> Box<[T]> {
    let (a_layout, b_layout) = (a.layout(), b.layout());
    let mut tile = vec![T::zero(); target.len()];

    for p in 0..a_layout.grid_cols() {
        let (Some(a_block), Some(b_block)) = (
            a_layout.descriptor_at(target.block_row, p),
            b_layout.descriptor_at(p, target.block_col),
        ) else {
            panic!(
                "tile triple ({}, {}, {p}) falls outside the operand grids",
                target.block_row, target.block_col
            );
        };
        assert_eq!(a_block.row_extent, target.row_extent, "left tile rows");
        assert_eq!(b_block.col_extent, target.col_extent, "right tile columns");
        assert_eq!(a_block.col_extent, b_block.row_extent, "shared tile extent");

        let a_tile = a
            .tile(a_layout.linear_index(target.block_row, p))
            .unwrap_or(&zeros[..a_block.len()]);
        let b_tile = b
            .tile(b_layout.linear_index(p, target.block_col))
            .unwrap_or(&zeros[..b_block.len()]);

        kernel::multiply_accumulate(
            a_tile,
            b_tile,
            &mut tile,
            a_block.row_extent,
            a_block.col_extent,
            b_block.col_extent,
        );
    }

    tile.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemat_core::{BlockOrder, TilematError};

    fn store_from(rows: &[&[f64]], block: usize, order: BlockOrder) -> BlockStore<f64> {
        let layout = BlockLayout::square(rows.len(), rows[0].len(), block, order).unwrap();
        let mut store = BlockStore::new(layout);
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                store.set(r, c, v).unwrap();
            }
        }
        store
    }

    #[test]
    fn test_concrete_product() {
        let a = store_from(
            &[&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0], &[1.0, 2.0, 6.0]],
            2,
            BlockOrder::RowMajor,
        );
        let b = store_from(&[&[1.0], &[2.0], &[3.0]], 2, BlockOrder::ColumnMajor);

        for parallel in [false, true] {
            let c = multiply_blocked(&a, &b, parallel).unwrap();
            assert_eq!(c.dimensions(), (3, 1));
            assert_eq!(c.layout().block_size(), (2, 2));
            assert_eq!(c.layout().order(), BlockOrder::RowMajor);
            assert_eq!(c.get(0, 0), Ok(14.0));
            assert_eq!(c.get(1, 0), Ok(17.0));
            assert_eq!(c.get(2, 0), Ok(23.0));
        }
    }

    #[test]
    fn test_unwritten_tiles_contribute_zero() {
        let a_layout = BlockLayout::square(4, 4, 2, BlockOrder::RowMajor).unwrap();
        let mut a = BlockStore::new(a_layout);
        a.set(0, 0, 3.0).unwrap();
        let b = store_from(
            &[&[1.0, 1.0], &[1.0, 1.0], &[1.0, 1.0], &[1.0, 1.0]],
            2,
            BlockOrder::ColumnMajor,
        );

        let c = multiply_blocked(&a, &b, false).unwrap();
        assert_eq!(c.get(0, 0), Ok(3.0));
        assert_eq!(c.get(0, 1), Ok(3.0));
        assert_eq!(c.get(3, 1), Ok(0.0));
    }

    #[test]
    fn test_misaligned_inner_blocks_are_retiled() {
        let a = store_from(
            &[&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 4.0, 3.0, 2.0, 1.0]],
            2,
            BlockOrder::RowMajor,
        );
        let b = store_from(
            &[&[1.0], &[0.0], &[2.0], &[0.0], &[1.0]],
            3,
            BlockOrder::ColumnMajor,
        );

        let c = multiply_blocked(&a, &b, false).unwrap();
        assert_eq!(c.get(0, 0), Ok(12.0));
        assert_eq!(c.get(1, 0), Ok(12.0));
        assert_eq!(c.layout().block_size(), (2, 3));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = store_from(&[&[1.0, 2.0]], 2, BlockOrder::RowMajor);
        let b = store_from(&[&[1.0, 2.0]], 2, BlockOrder::RowMajor);
        assert_eq!(
            multiply_blocked(&a, &b, false),
            Err(TilematError::mismatch((1, 2), (1, 2)))
        );
    }
}
