//! Tile buffer ownership for one blocked matrix
//!
//! Tiles are allocated on the first non-zero write. A tile that was never
//! written reads as the additive identity.

use num_traits::Zero;
use tilemat_core::{BlockDescriptor, BlockLayout, BlockOrder, MatrixElement, Result};

/// Exclusively owned tile buffers, one slot per cell of the block grid
///
/// Slot `i` holds the tile at linear index `i` of the layout's block order.
/// Each tile is a row-major buffer of exactly `row_extent * col_extent`
/// elements; edge tiles are never padded.
#[derive(Debug, Clone)]
pub struct BlockStore<T: MatrixElement> {
    layout: BlockLayout,
    tiles: Vec<Option<Box<[T]>>>,
}

impl<T: MatrixElement> BlockStore<T> {
    /// Create an empty store; every element reads as zero
    pub fn new(layout: BlockLayout) -> Self {
        let tiles = (0..layout.block_count()).map(|_| None).collect();
        Self { layout, tiles }
    }

    /// Build a store from fully materialized tiles given in block order
    ///
    /// Panics if the tile count or any tile length disagrees with the
    /// layout; that can only come from a layout-construction bug.
    pub(crate) fn from_tiles(layout: BlockLayout, tiles: Vec<Box<[T]>>) -> Self {
        assert_eq!(
            tiles.len(),
            layout.block_count(),
            "tile count does not match layout {layout}"
        );
        for (descriptor, tile) in layout.blocks().zip(&tiles) {
            assert_eq!(
                tile.len(),
                descriptor.len(),
                "tile ({}, {}) does not match its extent",
                descriptor.block_row,
                descriptor.block_col
            );
        }

        Self {
            layout,
            tiles: tiles.into_iter().map(Some).collect(),
        }
    }

    /// The tiling of this store
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Matrix dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        self.layout.dimensions()
    }

    /// Read one element
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let position = self.layout.locate(row, col)?;
        Ok(self.tiles[position.block_index]
            .as_ref()
            .map_or_else(T::zero, |tile| tile[position.offset]))
    }

    /// Write one element, allocating its tile if needed
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let position = self.layout.locate(row, col)?;
        let slot = &mut self.tiles[position.block_index];

        match slot {
            Some(tile) => tile[position.offset] = value,
            None if value.is_plain_zero() => {}
            None => {
                let len = self
                    .layout
                    .descriptor(position.block_index)
                    .map_or(0, |d| d.len());
                let mut tile = vec![T::zero(); len].into_boxed_slice();
                tile[position.offset] = value;
                *slot = Some(tile);
            }
        }
        Ok(())
    }

    /// Tile buffer at a linear index, if it has been allocated
    pub fn tile(&self, index: usize) -> Option<&[T]> {
        self.tiles.get(index)?.as_deref()
    }

    /// Tile buffer at a grid position, if it has been allocated
    pub fn tile_at(&self, block_row: usize, block_col: usize) -> Option<&[T]> {
        self.layout.descriptor_at(block_row, block_col)?;
        self.tile(self.layout.linear_index(block_row, block_col))
    }

    /// Number of tiles with an allocated buffer
    pub fn materialized_tiles(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// All tiles in block order with their geometry
    pub fn tiles(&self) -> impl Iterator<Item = (BlockDescriptor, Option<&[T]>)> + '_ {
        self.layout
            .blocks()
            .zip(self.tiles.iter().map(|t| t.as_deref()))
    }

    /// Copy the values into a store with a different tiling
    pub fn relayout(&self, block_rows: usize, block_cols: usize, order: BlockOrder) -> Result<Self> {
        let (rows, cols) = self.dimensions();
        let layout = BlockLayout::new(rows, cols, block_rows, block_cols, order)?;
        let mut target = Self::new(layout);

        for (descriptor, tile) in self.tiles() {
            let Some(tile) = tile else { continue };
            for (offset, &value) in tile.iter().enumerate() {
                if value.is_plain_zero() {
                    continue;
                }
                let row = descriptor.row_start + offset / descriptor.col_extent;
                let col = descriptor.col_start + offset % descriptor.col_extent;
                target.set(row, col, value)?;
            }
        }
        Ok(target)
    }
}

/// Stores are equal when they share a layout and hold the same values;
/// an unallocated tile equals an all-zero one.
impl<T: MatrixElement> PartialEq for BlockStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.layout == other.layout
            && self
                .tiles
                .iter()
                .zip(&other.tiles)
                .all(|(left, right)| match (left, right) {
                    (Some(l), Some(r)) => l == r,
                    (Some(t), None) | (None, Some(t)) => t.iter().all(|v| v.is_zero()),
                    (None, None) => true,
                })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemat_core::TilematError;

    fn numbered(rows: usize, cols: usize, block: usize, order: BlockOrder) -> BlockStore<i64> {
        let layout = BlockLayout::square(rows, cols, block, order).unwrap();
        let mut store = BlockStore::new(layout);
        for r in 0..rows {
            for c in 0..cols {
                store.set(r, c, (r * 100 + c) as i64 + 1).unwrap();
            }
        }
        store
    }

    #[test]
    fn test_unwritten_reads_zero() {
        let layout = BlockLayout::square(7, 5, 3, BlockOrder::RowMajor).unwrap();
        let store = BlockStore::<f64>::new(layout);
        assert_eq!(store.get(6, 4), Ok(0.0));
        assert_eq!(store.materialized_tiles(), 0);
    }

    #[test]
    fn test_lazy_materialization() {
        let layout = BlockLayout::square(7, 5, 3, BlockOrder::ColumnMajor).unwrap();
        let mut store = BlockStore::new(layout);

        store.set(0, 0, 0.0).unwrap();
        assert_eq!(store.materialized_tiles(), 0);

        store.set(6, 4, 2.5).unwrap();
        assert_eq!(store.materialized_tiles(), 1);
        // Edge tile is 1x2
        assert_eq!(store.tile_at(2, 1), Some(&[0.0, 2.5][..]));
        assert_eq!(store.get(6, 3), Ok(0.0));
    }

    #[test]
    fn test_negative_zero_is_stored() {
        let layout = BlockLayout::square(4, 4, 2, BlockOrder::RowMajor).unwrap();
        let mut store = BlockStore::<f64>::new(layout);
        store.set(3, 3, -0.0).unwrap();
        assert_eq!(store.materialized_tiles(), 1);
        assert!(store.get(3, 3).unwrap().is_sign_negative());

        let moved = store.relayout(3, 3, BlockOrder::ColumnMajor).unwrap();
        assert!(moved.get(3, 3).unwrap().is_sign_negative());
    }

    #[test]
    fn test_round_trip_at_block_boundaries() {
        for order in [BlockOrder::RowMajor, BlockOrder::ColumnMajor] {
            let store = numbered(11, 9, 4, order);
            for r in 0..11 {
                for c in 0..9 {
                    assert_eq!(store.get(r, c), Ok((r * 100 + c) as i64 + 1));
                }
            }
            assert_eq!(store.materialized_tiles(), store.layout().block_count());
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let mut store = numbered(3, 3, 2, BlockOrder::RowMajor);
        assert!(matches!(
            store.get(3, 0),
            Err(TilematError::IndexOutOfBounds { .. })
        ));
        assert!(store.set(0, 3, 1).is_err());
    }

    #[test]
    fn test_relayout_preserves_values() {
        let store = numbered(10, 7, 3, BlockOrder::RowMajor);
        let moved = store.relayout(4, 2, BlockOrder::ColumnMajor).unwrap();
        assert_eq!(moved.layout().block_size(), (4, 2));
        assert_eq!(moved.layout().order(), BlockOrder::ColumnMajor);
        for r in 0..10 {
            for c in 0..7 {
                assert_eq!(moved.get(r, c), store.get(r, c));
            }
        }
    }

    #[test]
    fn test_equality_ignores_allocation() {
        let layout = BlockLayout::square(4, 4, 2, BlockOrder::RowMajor).unwrap();
        let mut written = BlockStore::new(layout);
        written.set(1, 1, 5.0).unwrap();
        written.set(1, 1, 0.0).unwrap();
        assert_eq!(written, BlockStore::new(layout));

        written.set(3, 0, 1.0).unwrap();
        assert_ne!(written, BlockStore::new(layout));
    }

    #[test]
    #[should_panic(expected = "tile count")]
    fn test_from_tiles_rejects_wrong_count() {
        let layout = BlockLayout::square(4, 4, 2, BlockOrder::RowMajor).unwrap();
        BlockStore::<f32>::from_tiles(layout, vec![vec![0.0; 4].into_boxed_slice()]);
    }
}
