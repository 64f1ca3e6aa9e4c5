//! Acceleration backend seam
//!
//! The multiply engine can hand dense products to an externally provided
//! optimized backend. No backend ships with this crate; the engine only
//! branches on whether one is registered and enabled.

use super::element::MatrixElement;
use crate::error::Result;

/// Trait for optimized general matrix multiply backends
///
/// All buffers are row-major and contiguous.
pub trait AccelerationBackend<T: MatrixElement>: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Compute `c = a * b` for an `m x n` left operand and `n x k` right operand
    ///
    /// `c` has length `m * k` and is zero-filled on entry.
    fn gemm(&self, m: usize, n: usize, k: usize, a: &[T], b: &[T], c: &mut [T]) -> Result<()>;
}
