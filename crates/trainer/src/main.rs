//! Flight Delay Trainer - fits the delay model from a flight CSV

use anyhow::Context;
use clap::Parser;
use feature_engine::{load_csv, FeatureDeriver, FeatureEncoder, Preprocessor, DEFAULT_DELAY_THRESHOLD_MINUTES};
use inference_engine::{DelayModel, SolverConfig, TrainConfig};
use std::path::PathBuf;
use storage::{FileModelStore, ModelStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trainer", version, about = "Train the flight delay model")]
struct Args {
    /// Flight CSV with Fecha-I, OPERA, TIPOVUELO, MES and Fecha-O columns
    #[arg(long)]
    data: PathBuf,

    /// Where to write the model blob
    #[arg(long, default_value = "model.bin")]
    model: PathBuf,

    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for the report
    #[arg(long, default_value_t = 0.33)]
    test_size: f64,

    /// Inverse regularization strength
    #[arg(long, default_value_t = 1.0)]
    c: f64,

    #[arg(long, default_value_t = 100)]
    max_iter: usize,

    /// Minutes past schedule that count as a delay
    #[arg(long, default_value_t = DEFAULT_DELAY_THRESHOLD_MINUTES)]
    delay_threshold: f64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("=== Flight Delay Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let records = load_csv(&args.data).with_context(|| format!("Failed to load {}", args.data.display()))?;
    info!("Loaded {} flights from {}", records.len(), args.data.display());

    let deriver = FeatureDeriver::new(args.delay_threshold);
    info!("Delay threshold: {} minutes", deriver.delay_threshold_minutes());
    let preprocessor = Preprocessor::new(deriver, FeatureEncoder::new());
    let set = preprocessor
        .preprocess_with_target(&records)
        .context("Failed to prepare training features")?;
    info!(
        "Target balance: {} on time, {} delayed",
        set.class_counts.n_y0, set.class_counts.n_y1
    );

    let model = DelayModel::new(TrainConfig {
        test_size: args.test_size,
        seed: args.seed,
        solver: SolverConfig {
            c: args.c,
            max_iter: args.max_iter,
            ..Default::default()
        },
    });
    let config = model.config();
    info!(
        "Split seed {}, test size {}, C={}, max_iter={}",
        config.seed, config.test_size, config.solver.c, config.solver.max_iter
    );
    let store = FileModelStore::new(&args.model);
    let outcome = model.fit_set(&set, &store).context("Training failed")?;

    if !outcome.converged {
        warn!("Solver stopped after {} iterations without converging", outcome.iterations);
    }
    info!(
        "Trained on {} rows, evaluated on {} rows ({} iterations)",
        outcome.train_rows, outcome.test_rows, outcome.iterations
    );
    info!("Held-out report:\n{}", outcome.report);
    info!("Model written to {}", store.location());

    Ok(())
}
