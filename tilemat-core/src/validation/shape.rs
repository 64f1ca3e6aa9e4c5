//! Operand shape validation for algebraic operations

use crate::TilematError;

/// Validate that `left * right` is defined
pub const fn validate_product_shapes(
    left: (usize, usize),
    right: (usize, usize),
) -> Result<(), TilematError> {
    if left.1 != right.0 {
        return Err(TilematError::mismatch(left, right));
    }
    Ok(())
}

/// Validate that two operands have identical shape (element-wise operations)
pub const fn validate_same_shape(
    left: (usize, usize),
    right: (usize, usize),
) -> Result<(), TilematError> {
    if left.0 != right.0 || left.1 != right.1 {
        return Err(TilematError::mismatch(left, right));
    }
    Ok(())
}

/// Validate a linear system `a x = b`: square `a` with matching row count in `b`
pub const fn validate_square_system(
    a: (usize, usize),
    b: (usize, usize),
) -> Result<(), TilematError> {
    if a.0 != a.1 || a.0 != b.0 {
        return Err(TilematError::mismatch(a, b));
    }
    Ok(())
}
