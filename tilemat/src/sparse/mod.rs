//! Sparse storage
//!
//! `SparseEntryStore` holds the non-zero values of a matrix keyed by
//! coordinate; `SparseMatrix` puts the `Matrix` contract on top of it.

pub mod entry_store;
pub mod matrix;

pub use entry_store::{Capacity, Coordinate, Entries, SparseEntryStore};
pub use matrix::{SparseByteMatrix, SparseMatrix};
