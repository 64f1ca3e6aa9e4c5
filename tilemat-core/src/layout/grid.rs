//! Tiling of a matrix shape into a grid of blocks
//!
//! A `BlockLayout` is pure arithmetic over `(rows, cols, block_rows,
//! block_cols, order)`. Every lookup is O(1) and nothing is allocated.

use core::fmt;

use super::{BlockDescriptor, BlockOrder, TilePosition};
use crate::validation::{check_coordinates, checked_element_count, validate_block_size};
use crate::Result;

/// Partition of `[0, rows) x [0, cols)` into rectangular tiles
///
/// Tiles have the nominal `block_rows x block_cols` size except on the last
/// block row and block column, where they shrink to the remainder when the
/// dimension is not an exact multiple.
///
/// Deserialization goes through [`BlockLayout::new`], so a zero block size
/// is rejected and the stored grid dimensions are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LayoutFields"))]
pub struct BlockLayout {
    rows: usize,
    cols: usize,
    block_rows: usize,
    block_cols: usize,
    order: BlockOrder,
    grid_rows: usize,
    grid_cols: usize,
}

impl BlockLayout {
    /// Create a layout with rectangular blocks
    pub const fn new(
        rows: usize,
        cols: usize,
        block_rows: usize,
        block_cols: usize,
        order: BlockOrder,
    ) -> Result<Self> {
        if let Err(e) = validate_block_size(block_rows, block_cols) {
            return Err(e);
        }
        if let Err(e) = checked_element_count(rows, cols) {
            return Err(e);
        }

        Ok(Self {
            rows,
            cols,
            block_rows,
            block_cols,
            order,
            grid_rows: rows.div_ceil(block_rows),
            grid_cols: cols.div_ceil(block_cols),
        })
    }

    /// Create a layout with square `block_size x block_size` blocks
    pub const fn square(rows: usize, cols: usize, block_size: usize, order: BlockOrder) -> Result<Self> {
        Self::new(rows, cols, block_size, block_size, order)
    }

    /// Same tiling with a different block order
    pub const fn with_order(mut self, order: BlockOrder) -> Self {
        self.order = order;
        self
    }

    /// Matrix dimensions as (rows, cols)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Nominal block size as (block_rows, block_cols)
    pub const fn block_size(&self) -> (usize, usize) {
        (self.block_rows, self.block_cols)
    }

    /// Nominal rows per block
    pub const fn block_rows(&self) -> usize {
        self.block_rows
    }

    /// Nominal columns per block
    pub const fn block_cols(&self) -> usize {
        self.block_cols
    }

    /// Block traversal order
    pub const fn order(&self) -> BlockOrder {
        self.order
    }

    /// Block grid dimensions as (block rows, block columns)
    pub const fn grid_dimensions(&self) -> (usize, usize) {
        (self.grid_rows, self.grid_cols)
    }

    /// Number of block rows
    pub const fn grid_rows(&self) -> usize {
        self.grid_rows
    }

    /// Number of block columns
    pub const fn grid_cols(&self) -> usize {
        self.grid_cols
    }

    /// Total number of tiles
    pub const fn block_count(&self) -> usize {
        self.grid_rows * self.grid_cols
    }

    /// Rows covered by tiles in the given block row, which must be in the grid
    const fn row_extent(&self, block_row: usize) -> usize {
        let start = block_row * self.block_rows;
        let remaining = self.rows - start;
        if remaining < self.block_rows {
            remaining
        } else {
            self.block_rows
        }
    }

    /// Columns covered by tiles in the given block column, which must be in the grid
    const fn col_extent(&self, block_col: usize) -> usize {
        let start = block_col * self.block_cols;
        let remaining = self.cols - start;
        if remaining < self.block_cols {
            remaining
        } else {
            self.block_cols
        }
    }

    /// Largest tile buffer length in this layout
    pub const fn max_tile_len(&self) -> usize {
        let r = if self.rows < self.block_rows { self.rows } else { self.block_rows };
        let c = if self.cols < self.block_cols { self.cols } else { self.block_cols };
        r * c
    }

    /// Linear tile index of a grid position in this layout's order
    ///
    /// The grid position must be inside the grid.
    pub const fn linear_index(&self, block_row: usize, block_col: usize) -> usize {
        match self.order {
            BlockOrder::RowMajor => block_row * self.grid_cols + block_col,
            BlockOrder::ColumnMajor => block_col * self.grid_rows + block_row,
        }
    }

    /// Grid position of a linear tile index in this layout's order
    ///
    /// The index must be below `block_count()`.
    pub const fn grid_position(&self, index: usize) -> (usize, usize) {
        match self.order {
            BlockOrder::RowMajor => (index / self.grid_cols, index % self.grid_cols),
            BlockOrder::ColumnMajor => (index % self.grid_rows, index / self.grid_rows),
        }
    }

    /// Descriptor of the tile at a linear index
    pub const fn descriptor(&self, index: usize) -> Option<BlockDescriptor> {
        if index >= self.block_count() {
            return None;
        }
        let (block_row, block_col) = self.grid_position(index);
        Some(self.describe(block_row, block_col))
    }

    /// Descriptor of the tile at a grid position
    pub const fn descriptor_at(&self, block_row: usize, block_col: usize) -> Option<BlockDescriptor> {
        if block_row >= self.grid_rows || block_col >= self.grid_cols {
            return None;
        }
        Some(self.describe(block_row, block_col))
    }

    /// Translate a matrix coordinate into its tile and in-tile offset
    pub const fn locate(&self, row: usize, col: usize) -> Result<TilePosition> {
        if let Err(e) = check_coordinates(row, col, (self.rows, self.cols)) {
            return Err(e);
        }

        let block_row = row / self.block_rows;
        let block_col = col / self.block_cols;
        let local_row = row % self.block_rows;
        let local_col = col % self.block_cols;

        Ok(TilePosition {
            block_index: self.linear_index(block_row, block_col),
            local_row,
            local_col,
            offset: local_row * self.col_extent(block_col) + local_col,
        })
    }

    /// Iterate over all tiles in block order
    pub const fn blocks(&self) -> Blocks {
        Blocks {
            layout: *self,
            next: 0,
        }
    }

    const fn describe(&self, block_row: usize, block_col: usize) -> BlockDescriptor {
        BlockDescriptor {
            block_row,
            block_col,
            row_start: block_row * self.block_rows,
            row_extent: self.row_extent(block_row),
            col_start: block_col * self.block_cols,
            col_extent: self.col_extent(block_col),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LayoutFields {
    rows: usize,
    cols: usize,
    block_rows: usize,
    block_cols: usize,
    order: BlockOrder,
}

#[cfg(feature = "serde")]
impl TryFrom<LayoutFields> for BlockLayout {
    type Error = crate::TilematError;

    fn try_from(fields: LayoutFields) -> Result<Self> {
        Self::new(fields.rows, fields.cols, fields.block_rows, fields.block_cols, fields.order)
    }
}

impl fmt::Display for BlockLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} in {}x{} blocks ({}x{} grid, {})",
            self.rows,
            self.cols,
            self.block_rows,
            self.block_cols,
            self.grid_rows,
            self.grid_cols,
            self.order
        )
    }
}

impl<'a> IntoIterator for &'a BlockLayout {
    type Item = BlockDescriptor;
    type IntoIter = Blocks;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks()
    }
}

/// Iterator over the tiles of a layout in block order
#[derive(Debug, Clone)]
pub struct Blocks {
    layout: BlockLayout,
    next: usize,
}

impl Iterator for Blocks {
    type Item = BlockDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let descriptor = self.layout.descriptor(self.next)?;
        self.next += 1;
        Some(descriptor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for Blocks {
    fn len(&self) -> usize {
        self.layout.block_count().saturating_sub(self.next)
    }
}
