//! Delay Inference Engine
//!
//! Trains the class-weighted logistic regression behind the flight delay
//! service and serves predictions from an immutable, shareable model handle.

mod engine;
mod logistic;
mod model;
mod report;
mod split;

pub use engine::{DelayModel, FitOutcome, InferenceEngine, TrainConfig};
pub use logistic::{sigmoid, ClassWeights, LogisticRegression, SolverConfig, SolverSummary};
pub use model::{ModelState, MODEL_FORMAT_VERSION};
pub use report::{ClassMetrics, ClassificationReport};
pub use split::{split_sizes, train_test_split, Split};

use storage::StorageError;
use thiserror::Error;

/// Errors while training
#[derive(Debug, Error)]
pub enum FitError {
    #[error("Row count mismatch: {features} feature rows, {target} target rows")]
    ShapeMismatch { features: usize, target: usize },
    #[error("Invalid label {value} at row {row}, expected 0 or 1")]
    InvalidLabel { row: usize, value: u8 },
    #[error("Cannot split {rows} rows with test size {test_size}")]
    EmptySplit { rows: usize, test_size: f64 },
    #[error("Training split only contains label {0}")]
    SingleClass(u8),
    #[error("Solver failed: {0}")]
    Solver(String),
    #[error("Model serialization failed: {0}")]
    Serialize(String),
    #[error("Model persistence failed: {0}")]
    Persist(#[from] StorageError),
}

/// Errors while loading or serving a model
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("No trained model available at {0}")]
    ModelUnavailable(String),
    #[error("Model blob is corrupt: {0}")]
    Corrupt(String),
    #[error("Model feature schema mismatch: expected [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },
    #[error("Storage error: {0}")]
    Storage(StorageError),
}
