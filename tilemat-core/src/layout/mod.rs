//! Block layout definitions
//!
//! This module contains pure tiling arithmetic for blocked matrices: the
//! block order tag, per-tile descriptors and the layout grid itself.
//! No storage and no allocation.

pub mod descriptor;
pub mod grid;
pub mod order;

pub use descriptor::{BlockDescriptor, TilePosition};
pub use grid::{BlockLayout, Blocks};
pub use order::BlockOrder;
