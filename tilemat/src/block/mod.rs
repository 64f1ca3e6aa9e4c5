//! Blocked dense storage
//!
//! `BlockStore` owns the tile buffers of one matrix; `BlockMatrix` exposes
//! them through the `Matrix` contract.

pub mod matrix;
pub mod store;

pub use matrix::BlockMatrix;
pub use store::BlockStore;
