//! LU factorization with partial pivoting

use num_traits::Float;
use tilemat_core::{validate_square_system, Matrix, MatrixElement, Result};

use crate::dense::DenseMatrix;

/// Packed `PA = LU` factors of a square matrix
///
/// `L` (unit diagonal, not stored) sits below the diagonal of `lu`, `U` on
/// and above it. `pivots[k]` is the row swapped into position `k` at step
/// `k`.
#[derive(Debug, Clone)]
pub struct LuFactors<T: MatrixElement> {
    lu: DenseMatrix<T>,
    pivots: Vec<usize>,
    swaps: usize,
}

/// Factor a square matrix
///
/// Returns `Ok(None)` when a pivot is negligible relative to the largest
/// input magnitude, i.e. the matrix is singular to working precision.
pub fn lu_factor<T: MatrixElement + Float>(a: &DenseMatrix<T>) -> Result<Option<LuFactors<T>>> {
    validate_square_system(a.dimensions(), (a.nrows(), 0))?;
    let n = a.nrows();
    let mut lu = a.clone();
    let mut pivots: Vec<usize> = (0..n).collect();
    let mut swaps = 0;

    let scale = lu
        .as_slice()
        .iter()
        .fold(T::zero(), |acc, v| acc.max(v.abs()));
    let tolerance = scale * T::epsilon() * T::from_f64(n.max(1) as f64);

    let data = lu.as_mut_slice();
    for k in 0..n {
        let (pivot_row, pivot_abs) = (k..n)
            .map(|i| (i, data[i * n + k].abs()))
            .fold((k, T::zero()), |best, cur| if cur.1 > best.1 { cur } else { best });

        if !(pivot_abs > tolerance) {
            return Ok(None);
        }

        pivots[k] = pivot_row;
        if pivot_row != k {
            for j in 0..n {
                data.swap(k * n + j, pivot_row * n + j);
            }
            swaps += 1;
        }

        let pivot = data[k * n + k];
        for i in k + 1..n {
            let factor = data[i * n + k] / pivot;
            data[i * n + k] = factor;
            for j in k + 1..n {
                let upper = data[k * n + j];
                data[i * n + j] -= factor * upper;
            }
        }
    }

    Ok(Some(LuFactors { lu, pivots, swaps }))
}

impl<T: MatrixElement + Float> LuFactors<T> {
    /// Order of the factored matrix
    pub fn size(&self) -> usize {
        self.pivots.len()
    }

    /// Determinant of the factored matrix
    pub fn determinant(&self) -> T {
        let n = self.size();
        let sign = if self.swaps % 2 == 0 { T::one() } else { -T::one() };
        (0..n).fold(sign, |det, i| det * self.lu.as_slice()[i * n + i])
    }

    /// Solve `A X = B` for every column of `rhs`
    pub fn solve(&self, rhs: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        let n = self.size();
        validate_square_system((n, n), rhs.dimensions())?;
        let cols = rhs.ncols();
        let lu = self.lu.as_slice();

        let mut x = rhs.clone();
        let data = x.as_mut_slice();

        for (k, &p) in self.pivots.iter().enumerate() {
            if p != k {
                for j in 0..cols {
                    data.swap(k * cols + j, p * cols + j);
                }
            }
        }

        // Forward substitution with unit-diagonal L
        for i in 0..n {
            for l in 0..i {
                let factor = lu[i * n + l];
                for j in 0..cols {
                    let y = data[l * cols + j];
                    data[i * cols + j] -= factor * y;
                }
            }
        }

        // Back substitution with U
        for i in (0..n).rev() {
            for l in i + 1..n {
                let factor = lu[i * n + l];
                for j in 0..cols {
                    let y = data[l * cols + j];
                    data[i * cols + j] -= factor * y;
                }
            }
            let diagonal = lu[i * n + i];
            for j in 0..cols {
                data[i * cols + j] = data[i * cols + j] / diagonal;
            }
        }

        Ok(x)
    }
}

/// Solve `A X = B` by LU factorization
///
/// `Ok(None)` signals a singular system or a non-finite solution.
pub fn solve_dense<T: MatrixElement + Float>(
    a: &DenseMatrix<T>,
    rhs: &DenseMatrix<T>,
) -> Result<Option<DenseMatrix<T>>> {
    validate_square_system(a.dimensions(), rhs.dimensions())?;
    let Some(factors) = lu_factor(a)? else {
        return Ok(None);
    };
    let x = factors.solve(rhs)?;
    if x.as_slice().iter().all(|v| v.is_finite()) {
        Ok(Some(x))
    } else {
        Ok(None)
    }
}
