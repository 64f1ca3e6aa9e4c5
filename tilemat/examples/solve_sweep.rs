//! Sweep square solves over a range of sizes and matrix kinds
//!
//! For each size a random system `A`, `X`, `B = A X` is built and handed to
//! `SolveDispatch`; the outcome is printed as a duration or a sentinel.

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilemat::{
    BlockMatrix, DenseMatrix, EngineConfig, Matrix, MultiplyEngine, SolveDispatch, SparseMatrix,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Time dense, blocked and sparse solves across matrix sizes
#[derive(Parser, Debug)]
#[command(name = "solve_sweep")]
#[command(about, long_about = None)]
struct Cli {
    /// Matrix sizes to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [10, 50, 100, 200])]
    sizes: Vec<usize>,

    /// Matrix kinds to sweep
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Kind::Dense, Kind::Blocked, Kind::Sparse])]
    kinds: Vec<Kind>,

    /// Block size for blocked matrices and the multiply engine
    #[arg(long, default_value = "32")]
    block_size: usize,

    /// Seed for the random systems
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Use the naive multiply path when building right-hand sides
    #[arg(long)]
    naive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Matrix representation under test
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Contiguous row-major matrix
    Dense,
    /// Tiled matrix
    Blocked,
    /// Sparse matrix (no solve capability)
    Sparse,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = EngineConfig::with_block_size(cli.block_size).with_blocked_multiply(!cli.naive);
    let engine = MultiplyEngine::new(config.clone())?;
    let dispatch = SolveDispatch::new().with_quiesce(|| tracing::debug!("quiescing before solve"));
    let mut rng = StdRng::seed_from_u64(cli.seed);

    info!(path = %engine.path(), block_size = cli.block_size, "starting sweep");
    println!("{:>8} {:>10} {:>14}", "size", "kind", "outcome");

    for &size in &cli.sizes {
        let a = random_dense(&mut rng, size, size)?;
        let x = random_dense(&mut rng, size, 1)?;
        let b = engine.mtimes(&a, &x)?;

        for &kind in &cli.kinds {
            let outcome = match kind {
                Kind::Dense => dispatch.run(&a, &b),
                Kind::Blocked => {
                    let blocked = BlockMatrix::from_matrix(
                        &a,
                        config.block_rows,
                        config.block_cols,
                        config.block_order,
                    )?;
                    dispatch.run(&blocked, &b)
                }
                Kind::Sparse => dispatch.run(&SparseMatrix::from_matrix(&a)?, &b),
            };
            println!("{:>8} {:>10} {:>14}", a.nrows(), format!("{kind:?}"), outcome.to_string());
        }
    }

    Ok(())
}

fn random_dense(rng: &mut StdRng, rows: usize, cols: usize) -> tilemat::Result<DenseMatrix<f64>> {
    let data = (0..rows * cols).map(|_| rng.gen_range(-1.0..1.0)).collect();
    DenseMatrix::from_vec(rows, cols, data)
}
