//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored in dense, blocked and sparse matrices.

use core::fmt;

use num_traits::NumAssign;

/// Value types supported as matrix elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ValueType {
    F32 = 0,
    F64 = 1,
    I32 = 2,
    I64 = 3,
    Byte = 4,
    U32 = 5,
    U64 = 6,
}

impl ValueType {
    /// Get the size in bytes for this value type
    pub const fn size_bytes(&self) -> usize {
        match self {
            ValueType::Byte => 1,
            ValueType::F32 | ValueType::I32 | ValueType::U32 => 4,
            ValueType::F64 | ValueType::I64 | ValueType::U64 => 8,
        }
    }

    /// Whether values of this type are floating point
    pub const fn is_float(&self) -> bool {
        matches!(self, ValueType::F32 | ValueType::F64)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::F32 => write!(f, "f32"),
            ValueType::F64 => write!(f, "f64"),
            ValueType::I32 => write!(f, "i32"),
            ValueType::I64 => write!(f, "i64"),
            ValueType::Byte => write!(f, "byte"),
            ValueType::U32 => write!(f, "u32"),
            ValueType::U64 => write!(f, "u64"),
        }
    }
}

/// Trait for types that can be stored as matrix elements
///
/// All element types must be:
/// - Copy: tiles and entries are read by value
/// - NumAssign: the tile kernel multiply-accumulates in place
/// - Send + Sync: output tiles may be computed on worker threads
///
/// The additive identity is `Self::zero()`; sparse stores never keep it
/// explicitly and unmaterialized tiles read as it.
pub trait MatrixElement:
    Copy + PartialEq + fmt::Debug + fmt::Display + NumAssign + Send + Sync + 'static
{
    /// Get the value type tag for this element type
    fn value_type() -> ValueType;

    /// Get the size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Convert from f64 for generic construction
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for generic comparison and reporting
    fn to_f64(self) -> f64;

    /// Zero without a sign bit
    ///
    /// Dense tiles may skip storing these; a negative float zero still has
    /// to be written so it reads back with its sign.
    fn is_plain_zero(self) -> bool {
        self.is_zero() && !self.to_f64().is_sign_negative()
    }
}

macro_rules! impl_matrix_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl MatrixElement for $ty {
                fn value_type() -> ValueType {
                    ValueType::$tag
                }

                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_matrix_element! {
    f32 => F32,
    f64 => F64,
    i32 => I32,
    i64 => I64,
    u8 => Byte,
    u32 => U32,
    u64 => U64,
}
