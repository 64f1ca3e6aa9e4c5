//! Timed solve dispatch with fault containment
//!
//! Whether a matrix type can solve linear systems is declared through
//! `SolveCapability`, checked at compile time per type. `SolveDispatch`
//! turns every outcome of a wrapped solve into a `SolveOutcome` value so a
//! sweep over many systems keeps going when one of them fails.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use num_traits::Float;
use tilemat_core::{MatrixElement, Result};
use tracing::{debug, warn};

use super::lu::solve_dense;
use crate::block::BlockMatrix;
use crate::dense::DenseMatrix;
use crate::sparse::SparseMatrix;

/// Solve `self * X = rhs`
///
/// `Ok(None)` means the solver ran but produced no solution (for example a
/// singular coefficient matrix).
pub trait Solve<T: MatrixElement> {
    fn solve(&self, rhs: &DenseMatrix<T>) -> Result<Option<DenseMatrix<T>>>;
}

/// Solve support advertised by a matrix type
pub enum Capability<'a, T: MatrixElement> {
    Solvable(&'a dyn Solve<T>),
    Unsupported,
}

impl<T: MatrixElement> fmt::Debug for Capability<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Solvable(_) => write!(f, "Solvable"),
            Capability::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Declares whether a matrix type can solve linear systems
pub trait SolveCapability<T: MatrixElement> {
    fn solve_capability(&self) -> Capability<'_, T>;
}

impl<T: MatrixElement + Float> Solve<T> for DenseMatrix<T> {
    fn solve(&self, rhs: &DenseMatrix<T>) -> Result<Option<DenseMatrix<T>>> {
        solve_dense(self, rhs)
    }
}

impl<T: MatrixElement + Float> Solve<T> for BlockMatrix<T> {
    fn solve(&self, rhs: &DenseMatrix<T>) -> Result<Option<DenseMatrix<T>>> {
        solve_dense(&self.to_dense()?, rhs)
    }
}

macro_rules! solvable {
    ($($ty:ty),*) => {
        $(
            impl SolveCapability<$ty> for DenseMatrix<$ty> {
                fn solve_capability(&self) -> Capability<'_, $ty> {
                    Capability::Solvable(self)
                }
            }

            impl SolveCapability<$ty> for BlockMatrix<$ty> {
                fn solve_capability(&self) -> Capability<'_, $ty> {
                    Capability::Solvable(self)
                }
            }
        )*
    };
}

macro_rules! unsupported {
    ($($ty:ty),*) => {
        $(
            impl SolveCapability<$ty> for DenseMatrix<$ty> {
                fn solve_capability(&self) -> Capability<'_, $ty> {
                    Capability::Unsupported
                }
            }

            impl SolveCapability<$ty> for BlockMatrix<$ty> {
                fn solve_capability(&self) -> Capability<'_, $ty> {
                    Capability::Unsupported
                }
            }
        )*
    };
}

solvable!(f32, f64);
unsupported!(i32, i64, u8, u32, u64);

impl<T: MatrixElement> SolveCapability<T> for SparseMatrix<T> {
    fn solve_capability(&self) -> Capability<'_, T> {
        Capability::Unsupported
    }
}

/// Result of one dispatched solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The matrix type has no solve capability; nothing was timed
    NotAvailable,
    /// The solve failed, returned no solution, or panicked
    Error,
    /// Wall-clock time of the solve call alone
    Completed(Duration),
}

impl SolveOutcome {
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            SolveOutcome::Completed(elapsed) => Some(*elapsed),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SolveOutcome::Completed(_))
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::NotAvailable => write!(f, "NOTAVAILABLE"),
            SolveOutcome::Error => write!(f, "ERROR"),
            SolveOutcome::Completed(elapsed) => {
                write!(f, "{:.3}ms", elapsed.as_secs_f64() * 1000.0)
            }
        }
    }
}

type QuiesceHook = Box<dyn Fn() + Send + Sync>;

/// Runs solves and converts every outcome into a `SolveOutcome`
#[derive(Default)]
pub struct SolveDispatch {
    quiesce: Option<QuiesceHook>,
}

impl SolveDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` before each timed solve, e.g. to release caches
    ///
    /// The hook is advisory: a panic inside it is swallowed and the solve
    /// proceeds.
    pub fn with_quiesce<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.quiesce = Some(Box::new(hook));
        self
    }

    /// Solve `a * X = rhs`, timing only the solve call
    pub fn run<T, A>(&self, a: &A, rhs: &DenseMatrix<T>) -> SolveOutcome
    where
        T: MatrixElement,
        A: SolveCapability<T> + ?Sized,
    {
        let Capability::Solvable(solver) = a.solve_capability() else {
            debug!(value_type = %T::value_type(), "solve not available");
            return SolveOutcome::NotAvailable;
        };

        if let Some(hook) = &self.quiesce {
            if panic::catch_unwind(AssertUnwindSafe(|| hook())).is_err() {
                debug!("quiesce hook panicked; continuing");
            }
        }

        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| solver.solve(rhs)));
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(Ok(Some(_))) => SolveOutcome::Completed(elapsed),
            Ok(Ok(None)) => {
                debug!("solver produced no solution");
                SolveOutcome::Error
            }
            Ok(Err(error)) => {
                debug!(%error, category = ?error.category(), "solve failed");
                SolveOutcome::Error
            }
            Err(payload) => {
                warn!(panic = panic_message(payload.as_ref()), "solve panicked");
                SolveOutcome::Error
            }
        };
        debug!(%outcome, "solve dispatched");
        outcome
    }
}

impl fmt::Debug for SolveDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveDispatch")
            .field("quiesce", &self.quiesce.is_some())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
