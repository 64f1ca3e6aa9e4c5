//! tilemat - blocked dense and capacity-bounded sparse matrices
//!
//! This library provides tiled dense storage with a cache-friendly
//! block-by-block multiply engine, a sparse matrix backed by a bounded
//! coordinate store, and a solve dispatcher that reports sentinels instead
//! of failing.
//!
//! ## Architecture
//!
//! tilemat follows a clean specification/implementation separation:
//!
//! - **tilemat-core**: Error taxonomy, element and matrix traits, block
//!   layout arithmetic and validation (no_std, no allocation required)
//! - **tilemat**: Storage, multiply paths, sparse store, solving and
//!   engine configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tilemat::{BlockMatrix, BlockOrder, EngineConfig, MultiplyEngine};
//!
//! fn example() -> tilemat::Result<()> {
//!     let a = BlockMatrix::from_rows(&[[1.0, 2.0, 3.0], [1.0, 2.0, 4.0], [1.0, 2.0, 6.0]], 2, BlockOrder::RowMajor)?;
//!     let b = BlockMatrix::from_rows(&[[1.0], [2.0], [3.0]], 2, BlockOrder::ColumnMajor)?;
//!
//!     let engine = MultiplyEngine::new(EngineConfig::with_block_size(2))?;
//!     let c = engine.multiply(&a, &b)?;
//!     println!("{c}");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Blocked multiply**: Tile-by-tile product with a fixed accumulation
//!   order, bit-identical to the naive product for any block size or order
//! - **Parallel tiles**: Output tiles computed on the rayon pool
//! - **Sparse store**: Insertion-ordered entries with reject-on-full capacity
//! - **Solve dispatch**: Timed solves with `NotAvailable`/`Error` sentinels
//! - **serde** (default): JSON engine configuration

// Re-export core abstractions
pub use tilemat_core::{
    // Core traits
    AccelerationBackend, Matrix, MatrixElement, MatrixOperations, ValueType,
    // Layout
    BlockDescriptor, BlockLayout, BlockOrder, TilePosition,
    // Error handling
    ErrorCategory, Result, TilematError,
};

// Implementation modules
pub mod block;
pub mod config;
pub mod dense;
pub mod multiply;
pub mod solve;
pub mod sparse;

// Public exports
pub use block::{BlockMatrix, BlockStore};
pub use config::EngineConfig;
pub use dense::DenseMatrix;
pub use multiply::{multiply_blocked, MultiplyEngine, MultiplyPath};
pub use solve::{
    lu_factor, solve_dense, Capability, LuFactors, Solve, SolveCapability, SolveDispatch,
    SolveOutcome,
};
pub use sparse::{Capacity, SparseByteMatrix, SparseEntryStore, SparseMatrix};
