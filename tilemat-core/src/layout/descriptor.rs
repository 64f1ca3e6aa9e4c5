//! Per-tile geometry

/// Position and extent of one tile within a blocked matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockDescriptor {
    /// Row index of the tile in the block grid
    pub block_row: usize,
    /// Column index of the tile in the block grid
    pub block_col: usize,
    /// First matrix row covered by the tile
    pub row_start: usize,
    /// Number of matrix rows covered (smaller than nominal on the last block row)
    pub row_extent: usize,
    /// First matrix column covered by the tile
    pub col_start: usize,
    /// Number of matrix columns covered (smaller than nominal on the last block column)
    pub col_extent: usize,
}

impl BlockDescriptor {
    /// Number of elements in the tile buffer
    pub const fn len(&self) -> usize {
        self.row_extent * self.col_extent
    }

    /// Whether the tile covers no elements
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last matrix row covered
    pub const fn row_end(&self) -> usize {
        self.row_start + self.row_extent
    }

    /// One past the last matrix column covered
    pub const fn col_end(&self) -> usize {
        self.col_start + self.col_extent
    }

    /// Check if a matrix coordinate falls within this tile
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row_start && row < self.row_end() && col >= self.col_start && col < self.col_end()
    }

    /// Row-major offset of a matrix coordinate inside the tile buffer
    ///
    /// The coordinate must lie inside the tile.
    pub const fn local_offset(&self, row: usize, col: usize) -> usize {
        (row - self.row_start) * self.col_extent + (col - self.col_start)
    }
}

/// Location of a matrix coordinate inside a blocked layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePosition {
    /// Linear tile index in the layout's block order
    pub block_index: usize,
    /// Row within the tile
    pub local_row: usize,
    /// Column within the tile
    pub local_col: usize,
    /// Row-major offset within the tile buffer
    pub offset: usize,
}
