//! Persisted Model State

use crate::logistic::{ClassWeights, LogisticRegression};
use crate::InferenceError;
use feature_engine::FEATURE_COLUMNS;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Current blob layout
pub const MODEL_FORMAT_VERSION: u16 = 1;

/// Everything needed to serve predictions from a trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub version: u16,
    /// Schema the coefficients line up with
    pub feature_columns: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Weights used during training, kept for reference only
    pub class_weights: ClassWeights,
    /// Rows in the training split
    pub trained_rows: usize,
}

impl ModelState {
    /// Capture a fitted classifier
    pub fn new(model: &LogisticRegression, class_weights: ClassWeights, trained_rows: usize) -> Self {
        Self {
            version: MODEL_FORMAT_VERSION,
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            coefficients: model.coefficients().to_vec(),
            intercept: model.intercept(),
            class_weights,
            trained_rows,
        }
    }

    /// Serialize to an opaque blob
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Deserialize and check the blob against the current feature schema
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InferenceError> {
        let state: Self = postcard::from_bytes(bytes).map_err(|e| InferenceError::Corrupt(e.to_string()))?;

        if state.version != MODEL_FORMAT_VERSION {
            return Err(InferenceError::Corrupt(format!(
                "unsupported model format version {}",
                state.version
            )));
        }
        if state.feature_columns.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
            return Err(InferenceError::SchemaMismatch {
                expected: FEATURE_COLUMNS.join(", "),
                actual: state.feature_columns.join(", "),
            });
        }
        if state.coefficients.len() != FEATURE_COLUMNS.len() {
            return Err(InferenceError::Corrupt(format!(
                "{} coefficients for {} features",
                state.coefficients.len(),
                FEATURE_COLUMNS.len()
            )));
        }

        Ok(state)
    }

    /// Classifier described by this state
    pub fn classifier(&self) -> LogisticRegression {
        LogisticRegression::from_parts(Array1::from_vec(self.coefficients.clone()), self.intercept)
    }
}
