use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilemat::{
    BlockMatrix, BlockOrder, Capability, DenseMatrix, Matrix, Result, Solve, SolveCapability,
    SolveDispatch, SolveOutcome, SparseMatrix,
};

/// Random system `A`, `X`, `B = A X` with a diagonally dominant `A`
fn random_system(size: usize, seed: u64) -> (DenseMatrix<f64>, DenseMatrix<f64>, DenseMatrix<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a: Vec<f64> = (0..size * size).map(|_| rng.gen_range(-1.0..1.0)).collect();
    for i in 0..size {
        a[i * size + i] += size as f64;
    }
    let a = DenseMatrix::from_vec(size, size, a).unwrap();
    let x = DenseMatrix::from_vec(size, 1, (0..size).map(|_| rng.gen_range(-1.0..1.0)).collect()).unwrap();
    let b = a.mtimes(&x).unwrap();
    (a, x, b)
}

#[test]
fn test_solvable_system_completes() {
    let dispatch = SolveDispatch::new();
    for size in [1, 5, 20, 64] {
        let (a, x, b) = random_system(size, size as u64);
        let outcome = dispatch.run(&a, &b);
        assert!(outcome.elapsed().is_some(), "size {size}: {outcome}");

        let solved = a.solve(&b).unwrap().unwrap();
        for (s, e) in solved.as_slice().iter().zip(x.as_slice()) {
            assert!((s - e).abs() < 1e-8);
        }
    }
}

#[test]
fn test_blocked_matrix_solves() {
    let (a, _, b) = random_system(12, 99);
    let blocked = BlockMatrix::from_matrix(&a, 5, 5, BlockOrder::ColumnMajor).unwrap();
    assert!(SolveDispatch::new().run(&blocked, &b).is_completed());
}

#[test]
fn test_unsupported_types_are_not_available() {
    let quiesced = Arc::new(AtomicBool::new(false));
    let flag = quiesced.clone();
    let dispatch = SolveDispatch::new().with_quiesce(move || flag.store(true, Ordering::SeqCst));

    let sparse = SparseMatrix::<f64>::new(4, 4);
    let b = DenseMatrix::<f64>::zeros(4, 1).unwrap();
    assert_eq!(dispatch.run(&sparse, &b), SolveOutcome::NotAvailable);

    let bytes = BlockMatrix::<u8>::new(4, 4, 2, BlockOrder::RowMajor).unwrap();
    let rhs = DenseMatrix::<u8>::zeros(4, 1).unwrap();
    assert_eq!(dispatch.run(&bytes, &rhs), SolveOutcome::NotAvailable);

    assert!(!quiesced.load(Ordering::SeqCst));
}

#[test]
fn test_singular_and_malformed_systems_are_errors() {
    let dispatch = SolveDispatch::new();

    let singular = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]).unwrap();
    let b = DenseMatrix::from_rows(&[[1.0], [2.0], [3.0]]).unwrap();
    assert_eq!(dispatch.run(&singular, &b), SolveOutcome::Error);

    let rectangular = DenseMatrix::<f64>::zeros(3, 2).unwrap();
    assert_eq!(dispatch.run(&rectangular, &b), SolveOutcome::Error);

    let with_nan = DenseMatrix::from_rows(&[[f64::NAN, 0.0], [0.0, 1.0]]).unwrap();
    let rhs = DenseMatrix::from_rows(&[[1.0], [1.0]]).unwrap();
    assert_eq!(dispatch.run(&with_nan, &rhs), SolveOutcome::Error);
}

struct Panicking;

impl Solve<f32> for Panicking {
    fn solve(&self, rhs: &DenseMatrix<f32>) -> Result<Option<DenseMatrix<f32>>> {
        panic!("factorization of {} rows exploded", rhs.nrows());
    }
}

impl SolveCapability<f32> for Panicking {
    fn solve_capability(&self) -> Capability<'_, f32> {
        Capability::Solvable(self)
    }
}

#[test]
fn test_panics_are_contained() {
    let dispatch = SolveDispatch::new().with_quiesce(|| panic!("quiesce failed"));
    let rhs = DenseMatrix::<f32>::zeros(2, 1).unwrap();
    assert_eq!(dispatch.run(&Panicking, &rhs), SolveOutcome::Error);

    // A panicking quiesce hook does not stop a healthy solve
    let a = DenseMatrix::<f32>::identity(2).unwrap();
    assert!(dispatch.run(&a, &rhs).is_completed());
}
