//! Validation utilities
//!
//! Pure validation functions with no allocation. All functions are
//! arithmetic checks on coordinates, shapes and block sizes.

pub mod bounds;
pub mod shape;

pub use bounds::{check_coordinates, checked_element_count, validate_block_size};
pub use shape::{validate_product_shapes, validate_same_shape, validate_square_system};
