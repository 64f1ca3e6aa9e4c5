//! Engine configuration
//!
//! Feature toggles and tiling parameters are carried in an explicit value
//! handed to the engine, so two engines with different settings can run
//! side by side.

use tilemat_core::{validate_block_size, BlockOrder, Result, TilematError};

/// Configuration for multiply dispatch and tiling
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Select the tiled multiply path instead of the naive dot-product path
    pub use_blocked_multiply: bool,
    /// Delegate products to a registered acceleration backend
    pub use_native_acceleration: bool,
    /// Rows per block when operands have to be tiled by the engine
    pub block_rows: usize,
    /// Columns per block when operands have to be tiled by the engine
    pub block_cols: usize,
    /// Block order of engine-tiled operands
    pub block_order: BlockOrder,
    /// Compute output tiles on the rayon pool
    pub parallel: bool,
    /// Minimum number of output tiles before work is fanned out
    pub parallel_tile_threshold: usize,
}

impl EngineConfig {
    /// Create config with square blocks of the given size
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_rows: block_size,
            block_cols: block_size,
            ..Self::default()
        }
    }

    /// Set a rectangular block shape
    pub fn with_block_shape(mut self, block_rows: usize, block_cols: usize) -> Self {
        self.block_rows = block_rows;
        self.block_cols = block_cols;
        self
    }

    /// Toggle the tiled multiply path
    pub fn with_blocked_multiply(mut self, enabled: bool) -> Self {
        self.use_blocked_multiply = enabled;
        self
    }

    /// Toggle delegation to the acceleration backend
    pub fn with_native_acceleration(mut self, enabled: bool) -> Self {
        self.use_native_acceleration = enabled;
        self
    }

    /// Set the block order used when the engine tiles operands
    pub fn with_block_order(mut self, order: BlockOrder) -> Self {
        self.block_order = order;
        self
    }

    /// Toggle parallel tile computation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the minimum output tile count for parallel computation
    pub fn with_parallel_tile_threshold(mut self, threshold: usize) -> Self {
        self.parallel_tile_threshold = threshold;
        self
    }

    /// Whether a product with `tile_count` output tiles runs on the pool
    pub fn runs_parallel(&self, tile_count: usize) -> bool {
        self.parallel && tile_count >= self.parallel_tile_threshold.max(2)
    }

    /// Check that the configuration can drive the engine
    pub fn validate(&self) -> Result<()> {
        validate_block_size(self.block_rows, self.block_cols)
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|_| TilematError::InvalidConfiguration("malformed engine configuration"))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_blocked_multiply: true,
            use_native_acceleration: false,
            block_rows: 64,
            block_cols: 64,
            block_order: BlockOrder::RowMajor,
            parallel: true,
            parallel_tile_threshold: 4,
        }
    }
}
