use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilemat::{
    BlockMatrix, BlockOrder, DenseMatrix, EngineConfig, Matrix, MultiplyEngine, MultiplyPath,
    SparseMatrix, TilematError,
};

const ORDERS: [BlockOrder; 2] = [BlockOrder::RowMajor, BlockOrder::ColumnMajor];

fn random_dense(rows: usize, cols: usize, seed: u64) -> DenseMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols).map(|_| rng.gen_range(-1.0..1.0)).collect();
    DenseMatrix::from_vec(rows, cols, data).unwrap()
}

fn blocked(
    dense: &DenseMatrix<f64>,
    block_rows: usize,
    block_cols: usize,
    order: BlockOrder,
) -> BlockMatrix<f64> {
    BlockMatrix::from_matrix(dense, block_rows, block_cols, order).unwrap()
}

#[test]
fn test_every_order_combination_matches_naive() {
    let engine = MultiplyEngine::default();

    for (m, n, k) in [(50, 30, 40), (50, 31, 40), (51, 30, 40), (51, 30, 41)] {
        let a = random_dense(m, n, 7);
        let b = random_dense(n, k, 11);
        let expected = a.mtimes(&b).unwrap();

        for a_order in ORDERS {
            for b_order in ORDERS {
                let product = engine
                    .multiply(&blocked(&a, 5, 5, a_order), &blocked(&b, 5, 5, b_order))
                    .unwrap();
                assert_eq!(product.dimensions(), (m, k));
                assert_eq!(product.block_order(), a_order);
                assert_eq!(
                    product.to_dense().unwrap(),
                    expected,
                    "{m}x{n}x{k} with {a_order}/{b_order}"
                );
            }
        }
    }
}

#[test]
fn test_single_block_equals_any_partition() {
    let a = random_dense(110, 120, 1);
    let b = random_dense(120, 115, 2);
    let engine = MultiplyEngine::default();

    let whole = engine
        .multiply(
            &blocked(&a, 110, 120, BlockOrder::RowMajor),
            &blocked(&b, 120, 115, BlockOrder::RowMajor),
        )
        .unwrap()
        .to_dense()
        .unwrap();
    assert_eq!(whole, a.mtimes(&b).unwrap());

    for (block_rows, block_cols) in [(7, 7), (16, 9), (1, 120), (64, 64), (33, 1)] {
        for order in ORDERS {
            let a_blocked = blocked(&a, block_rows, block_cols, order);
            let b_blocked = blocked(&b, block_cols, block_rows, order.transposed());
            let product = engine.multiply(&a_blocked, &b_blocked).unwrap();
            assert_eq!(
                product.to_dense().unwrap(),
                whole,
                "{block_rows}x{block_cols} blocks"
            );
        }
    }
}

#[test]
fn test_misaligned_inner_blocks() {
    let a = random_dense(23, 29, 3);
    let b = random_dense(29, 17, 4);

    let product = MultiplyEngine::default()
        .multiply(
            &blocked(&a, 4, 6, BlockOrder::ColumnMajor),
            &blocked(&b, 5, 3, BlockOrder::RowMajor),
        )
        .unwrap();
    assert_eq!(product.layout().block_size(), (4, 3));
    assert_eq!(product.to_dense().unwrap(), a.mtimes(&b).unwrap());
}

#[test]
fn test_concrete_product() {
    let rows: &[[f64; 3]] = &[[1.0, 2.0, 3.0], [1.0, 2.0, 4.0], [1.0, 2.0, 6.0]];
    let a = BlockMatrix::from_rows(rows, 2, BlockOrder::RowMajor).unwrap();
    let b = BlockMatrix::from_rows(&[[1.0], [2.0], [3.0]], 2, BlockOrder::ColumnMajor).unwrap();

    let c = a.mtimes(&b).unwrap();
    assert_eq!(
        c.to_dense().unwrap(),
        DenseMatrix::from_rows(&[[14.0], [17.0], [23.0]]).unwrap()
    );
}

#[test]
fn test_product_then_subtract_keeps_block_size() {
    let a = blocked(&random_dense(12, 9, 5), 4, 4, BlockOrder::RowMajor);
    let b = blocked(&random_dense(9, 6, 6), 4, 3, BlockOrder::ColumnMajor);

    let product = a.mtimes(&b).unwrap();
    let diff = product.minus(&product).unwrap();
    assert_eq!(diff.layout().block_size(), product.layout().block_size());
    assert_eq!(diff.layout().block_size(), (4, 3));
    assert_eq!(diff.nnz(), 0);
}

#[test]
fn test_paths_agree_exactly() {
    let a = random_dense(37, 21, 8);
    let b = random_dense(21, 45, 9);
    let expected = a.mtimes(&b).unwrap();

    let configs = [
        EngineConfig::with_block_size(8),
        EngineConfig::with_block_size(8).with_parallel(false),
        EngineConfig::with_block_size(5).with_block_shape(5, 11),
        EngineConfig::default().with_blocked_multiply(false),
    ];
    for config in configs {
        let engine = MultiplyEngine::new(config.clone()).unwrap();
        assert_eq!(engine.mtimes(&a, &b).unwrap(), expected, "{config:?}");
    }

    let naive = MultiplyEngine::<f64>::new(EngineConfig::default().with_blocked_multiply(false)).unwrap();
    assert_eq!(naive.path(), MultiplyPath::Naive);
}

#[test]
fn test_sparse_operand_through_engine() {
    let mut sparse = SparseMatrix::new(6, 4);
    sparse.set(0, 0, 2.0).unwrap();
    sparse.set(5, 3, -1.5).unwrap();
    sparse.set(2, 1, 4.0).unwrap();
    let b = random_dense(4, 3, 10);

    let via_engine = MultiplyEngine::new(EngineConfig::with_block_size(3))
        .unwrap()
        .mtimes(&sparse, &b)
        .unwrap();
    assert_eq!(via_engine, DenseMatrix::from_matrix(&sparse).unwrap().mtimes(&b).unwrap());
}

#[test]
fn test_integer_elements() {
    let a = DenseMatrix::from_vec(9, 7, (0..63).map(|v| v % 5 - 2).collect::<Vec<i64>>()).unwrap();
    let b = DenseMatrix::from_vec(7, 4, (0..28).map(|v| v % 3 - 1).collect::<Vec<i64>>()).unwrap();

    let product = MultiplyEngine::default()
        .multiply(
            &BlockMatrix::from_matrix(&a, 2, 3, BlockOrder::ColumnMajor).unwrap(),
            &BlockMatrix::from_matrix(&b, 3, 2, BlockOrder::RowMajor).unwrap(),
        )
        .unwrap();
    assert_eq!(product.to_dense().unwrap(), a.mtimes(&b).unwrap());
}

#[test]
fn test_empty_shared_dimension() {
    let a = BlockMatrix::<f64>::new(3, 0, 2, BlockOrder::RowMajor).unwrap();
    let b = BlockMatrix::<f64>::new(0, 4, 2, BlockOrder::RowMajor).unwrap();
    let c = a.mtimes(&b).unwrap();
    assert_eq!(c.dimensions(), (3, 4));
    assert_eq!(c.nnz(), 0);
}

#[test]
fn test_dimension_mismatch() {
    let a = BlockMatrix::<f64>::new(3, 4, 2, BlockOrder::RowMajor).unwrap();
    let b = BlockMatrix::<f64>::new(3, 4, 2, BlockOrder::RowMajor).unwrap();
    assert_eq!(
        a.mtimes(&b),
        Err(TilematError::DimensionMismatch {
            left_rows: 3,
            left_cols: 4,
            right_rows: 3,
            right_cols: 4,
        })
    );
}

#[test]
fn test_invalid_block_size() {
    assert!(matches!(
        BlockMatrix::<f32>::new(4, 4, 0, BlockOrder::RowMajor),
        Err(TilematError::InvalidConfiguration(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_layout_json_goes_through_validation() {
    use tilemat::BlockLayout;

    let json = r#"{"rows":4,"cols":4,"block_rows":0,"block_cols":2,"order":"ROW_MAJOR","grid_rows":1,"grid_cols":2}"#;
    assert!(serde_json::from_str::<BlockLayout>(json).is_err());

    // Stale grid dimensions in the input are recomputed
    let json = r#"{"rows":5,"cols":4,"block_rows":2,"block_cols":2,"order":"COLUMN_MAJOR","grid_rows":1,"grid_cols":1}"#;
    let layout: BlockLayout = serde_json::from_str(json).unwrap();
    assert_eq!(layout.grid_dimensions(), (3, 2));

    let valid = BlockLayout::new(7, 3, 2, 3, BlockOrder::RowMajor).unwrap();
    let restored: BlockLayout = serde_json::from_str(&serde_json::to_string(&valid).unwrap()).unwrap();
    assert_eq!(restored, valid);
}
