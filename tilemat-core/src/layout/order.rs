//! Block traversal order

use core::fmt;

/// Linear storage and traversal sequence of the tiles of a matrix
///
/// The order is fixed when a layout is built. It changes how tiles are
/// enumerated, never which values a matrix holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BlockOrder {
    /// Tiles are laid out block-row by block-row
    #[default]
    RowMajor,
    /// Tiles are laid out block-column by block-column
    ColumnMajor,
}

impl BlockOrder {
    /// The other order
    pub const fn transposed(self) -> Self {
        match self {
            BlockOrder::RowMajor => BlockOrder::ColumnMajor,
            BlockOrder::ColumnMajor => BlockOrder::RowMajor,
        }
    }
}

impl fmt::Display for BlockOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockOrder::RowMajor => write!(f, "ROWMAJOR"),
            BlockOrder::ColumnMajor => write!(f, "COLUMNMAJOR"),
        }
    }
}
