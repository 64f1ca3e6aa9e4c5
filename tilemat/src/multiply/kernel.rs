//! Dense multiply-accumulate kernels
//!
//! Both kernels accumulate every output element over the shared index in
//! strictly increasing order, so a product split into tiles along the
//! shared dimension adds the same terms in the same sequence as the naive
//! product and the results agree bit for bit.

use tilemat_core::MatrixElement;

/// `c += a * b` for row-major `m x n`, `n x k` and `m x k` buffers
///
/// Loop order is i-l-j: the inner loop streams a row of `b` into a row of
/// `c`, and for a fixed `(i, j)` the terms arrive in increasing `l`.
#[inline]
pub fn multiply_accumulate<T: MatrixElement>(
    a: &[T],
    b: &[T],
    c: &mut [T],
    m: usize,
    n: usize,
    k: usize,
) {
    assert_eq!(a.len(), m * n, "left tile buffer does not match its extent");
    assert_eq!(b.len(), n * k, "right tile buffer does not match its extent");
    assert_eq!(c.len(), m * k, "output tile buffer does not match its extent");

    if n == 0 || k == 0 {
        return;
    }

    for (a_row, c_row) in a.chunks_exact(n).zip(c.chunks_exact_mut(k)) {
        for (l, &a_il) in a_row.iter().enumerate() {
            let b_row = &b[l * k..(l + 1) * k];
            for (c_ij, &b_lj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_il * b_lj;
            }
        }
    }
}

/// `c = a * b` computed as plain row-times-column dot products
///
/// `c` must be zero-filled on entry.
pub fn naive_multiply<T: MatrixElement>(a: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize) {
    for i in 0..m {
        for j in 0..k {
            let mut sum = T::zero();
            for l in 0..n {
                sum += a[i * n + l] * b[l * k + j];
            }
            c[i * k + j] = sum;
        }
    }
}
