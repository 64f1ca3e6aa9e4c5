//! Abstract interfaces for tilemat
//!
//! This module defines all trait abstractions shared by matrix
//! implementations. Traits are pure interfaces with no concrete storage.

pub mod backend;
pub mod element;
pub mod matrix;

pub use backend::AccelerationBackend;
pub use element::{MatrixElement, ValueType};
pub use matrix::Matrix;
#[cfg(feature = "alloc")]
pub use matrix::MatrixOperations;
