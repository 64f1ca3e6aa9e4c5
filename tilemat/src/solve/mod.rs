//! Linear system solving
//!
//! Dense floating-point matrices solve by LU factorization. `SolveDispatch`
//! wraps any solve-capable matrix with timing and fault containment.

pub mod dispatch;
pub mod lu;

pub use dispatch::{Capability, Solve, SolveCapability, SolveDispatch, SolveOutcome};
pub use lu::{lu_factor, solve_dense, LuFactors};
