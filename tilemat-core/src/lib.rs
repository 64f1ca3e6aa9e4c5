#![no_std]

//! tilemat core - block layout and matrix contract definitions
//!
//! This crate provides the allocation-free pieces shared by every matrix
//! implementation: the error taxonomy, element and matrix traits, the
//! acceleration backend seam, and block tiling arithmetic.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod error;
pub mod layout;
pub mod traits;
pub mod validation;

pub use error::*;
pub use layout::*;
pub use traits::*;
pub use validation::*;
