//! Matrix multiplication dispatch
//!
//! `MultiplyEngine` picks one of three paths from its `EngineConfig`:
//!
//! - **native**: `use_native_acceleration` is set and a backend is registered
//! - **blocked**: `use_blocked_multiply` is set; tile-by-tile product
//! - **naive**: plain row-times-column dot products
//!
//! The blocked and naive paths accumulate in the same order and produce
//! identical values.

pub mod blocked;
pub mod kernel;

use std::fmt;
use std::sync::Arc;

use tilemat_core::{
    validate_product_shapes, AccelerationBackend, BlockLayout, Matrix, MatrixElement, Result,
};
use tracing::{debug, instrument};

use crate::block::BlockMatrix;
use crate::config::EngineConfig;
use crate::dense::DenseMatrix;

pub use blocked::multiply_blocked;

/// Multiply strategy selected by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplyPath {
    Native,
    Blocked,
    Naive,
}

impl fmt::Display for MultiplyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiplyPath::Native => write!(f, "native"),
            MultiplyPath::Blocked => write!(f, "blocked"),
            MultiplyPath::Naive => write!(f, "naive"),
        }
    }
}

/// Configured matrix multiplication entry point
pub struct MultiplyEngine<T: MatrixElement> {
    config: EngineConfig,
    backend: Option<Arc<dyn AccelerationBackend<T>>>,
}

impl<T: MatrixElement> MultiplyEngine<T> {
    /// Create an engine; fails if the configuration is unusable
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            backend: None,
        })
    }

    /// Register an acceleration backend
    pub fn with_backend(mut self, backend: Arc<dyn AccelerationBackend<T>>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The path the next multiply will take
    pub fn path(&self) -> MultiplyPath {
        if self.config.use_native_acceleration && self.backend.is_some() {
            MultiplyPath::Native
        } else if self.config.use_blocked_multiply {
            MultiplyPath::Blocked
        } else {
            MultiplyPath::Naive
        }
    }

    /// Multiply two blocked matrices
    ///
    /// The result is tiled by `(a.block_rows, b.block_cols)` in `a`'s block
    /// order, whichever path computes it.
    #[instrument(level = "debug", skip_all, fields(m = a.nrows(), n = a.ncols(), k = b.ncols()))]
    pub fn multiply(&self, a: &BlockMatrix<T>, b: &BlockMatrix<T>) -> Result<BlockMatrix<T>> {
        validate_product_shapes(a.dimensions(), b.dimensions())?;
        let path = self.select_path();

        match path {
            MultiplyPath::Blocked => {
                let tiles = a.layout().grid_rows() * b.layout().grid_cols();
                let parallel = self.config.runs_parallel(tiles);
                debug!(%path, tiles, parallel, "multiplying");
                let store = multiply_blocked(a.store(), b.store(), parallel)?;
                Ok(BlockMatrix::from_store(store))
            }
            MultiplyPath::Native | MultiplyPath::Naive => {
                debug!(%path, "multiplying");
                let product = self.multiply_dense(&a.to_dense()?, &b.to_dense()?, path)?;
                let layout = BlockLayout::new(
                    a.nrows(),
                    b.ncols(),
                    a.layout().block_rows(),
                    b.layout().block_cols(),
                    a.layout().order(),
                )?;
                BlockMatrix::from_matrix_with_layout(&product, layout)
            }
        }
    }

    /// Multiply any two matrices into a dense result
    ///
    /// On the blocked path both operands are tiled with the configured
    /// block shape and order first.
    #[instrument(level = "debug", skip_all, fields(m = a.nrows(), n = a.ncols(), k = b.ncols()))]
    pub fn mtimes<A, B>(&self, a: &A, b: &B) -> Result<DenseMatrix<T>>
    where
        A: Matrix<Element = T> + ?Sized,
        B: Matrix<Element = T> + ?Sized,
    {
        validate_product_shapes(a.dimensions(), b.dimensions())?;
        let path = self.select_path();

        match path {
            MultiplyPath::Blocked => {
                let (block_rows, block_cols, order) = (
                    self.config.block_rows,
                    self.config.block_cols,
                    self.config.block_order,
                );
                let a = BlockMatrix::from_matrix(a, block_rows, block_cols, order)?;
                let b = BlockMatrix::from_matrix(b, block_rows, block_cols, order)?;
                self.multiply(&a, &b)?.to_dense()
            }
            MultiplyPath::Native | MultiplyPath::Naive => {
                debug!(%path, "multiplying");
                self.multiply_dense(&DenseMatrix::from_matrix(a)?, &DenseMatrix::from_matrix(b)?, path)
            }
        }
    }

    fn select_path(&self) -> MultiplyPath {
        let path = self.path();
        if self.config.use_native_acceleration && path != MultiplyPath::Native {
            debug!(fallback = %path, "native acceleration requested but no backend registered");
        }
        path
    }

    fn multiply_dense(
        &self,
        a: &DenseMatrix<T>,
        b: &DenseMatrix<T>,
        path: MultiplyPath,
    ) -> Result<DenseMatrix<T>> {
        let (m, n) = a.dimensions();
        let k = b.ncols();

        match (&self.backend, path) {
            (Some(backend), MultiplyPath::Native) => {
                debug!(backend = backend.name(), "delegating to acceleration backend");
                let mut out = DenseMatrix::zeros(m, k)?;
                backend.gemm(m, n, k, a.as_slice(), b.as_slice(), out.as_mut_slice())?;
                Ok(out)
            }
            _ => a.mtimes(b),
        }
    }
}

impl<T: MatrixElement> Default for MultiplyEngine<T> {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            backend: None,
        }
    }
}

impl<T: MatrixElement> fmt::Debug for MultiplyEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiplyEngine")
            .field("config", &self.config)
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .finish()
    }
}
