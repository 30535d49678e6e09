//! Delay Model Training and Inference

use crate::logistic::{ClassWeights, LogisticRegression, SolverConfig};
use crate::model::ModelState;
use crate::report::ClassificationReport;
use crate::split::train_test_split;
use crate::{FitError, InferenceError};
use feature_engine::{ClassCounts, FeatureMatrix, TrainingSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use storage::{ModelStore, StorageError};
use tracing::{debug, info};

/// Training parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Fraction of rows held out from training
    pub test_size: f64,
    /// Seed of the train/test shuffle
    pub seed: u64,
    /// Solver settings
    pub solver: SolverConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_size: 0.33,
            seed: 42,
            solver: SolverConfig::default(),
        }
    }
}

/// Result of a successful fit
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Engine serving the freshly trained model
    pub engine: InferenceEngine,
    /// Weights applied during training
    pub class_weights: ClassWeights,
    /// Metrics on the held-out rows
    pub report: ClassificationReport,
    pub train_rows: usize,
    pub test_rows: usize,
    pub iterations: usize,
    pub converged: bool,
}

/// Untrained delay classifier
#[derive(Debug, Clone, Default)]
pub struct DelayModel {
    config: TrainConfig,
}

impl DelayModel {
    /// Create an untrained model
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Training parameters
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Fit on a preprocessed training batch and persist the result
    pub fn fit_set(&self, set: &TrainingSet, store: &dyn ModelStore) -> Result<FitOutcome, FitError> {
        self.fit(&set.features, &set.target, set.class_counts, store)
    }

    /// Split, fit on the training rows with inverse-frequency class weights,
    /// persist the model and report on the held-out rows.
    ///
    /// `class_counts` are the label counts of the full batch.
    pub fn fit(
        &self,
        features: &FeatureMatrix,
        target: &[u8],
        class_counts: ClassCounts,
        store: &dyn ModelStore,
    ) -> Result<FitOutcome, FitError> {
        let start = Instant::now();

        if features.nrows() != target.len() {
            return Err(FitError::ShapeMismatch {
                features: features.nrows(),
                target: target.len(),
            });
        }
        if let Some((row, &value)) = target.iter().enumerate().find(|&(_, &y)| y > 1) {
            return Err(FitError::InvalidLabel { row, value });
        }

        let split = train_test_split(target.len(), self.config.test_size, self.config.seed)?;
        let x_train = features.select_rows(&split.train);
        let y_train: Vec<u8> = split.train.iter().map(|&i| target[i]).collect();

        let train_counts = ClassCounts::from_labels(&y_train);
        if train_counts.n_y0 == 0 || train_counts.n_y1 == 0 {
            let label = u8::from(train_counts.n_y1 > 0);
            return Err(FitError::SingleClass(label));
        }

        let class_weights = ClassWeights::inverse_frequency(class_counts.n_y0, class_counts.n_y1, y_train.len());
        info!(
            "Fitting delay model: train={}, test={}, weights={{0: {:.4}, 1: {:.4}}}",
            split.train.len(),
            split.test.len(),
            class_weights.negative,
            class_weights.positive
        );

        let (classifier, summary) =
            LogisticRegression::fit(x_train.values().view(), &y_train, class_weights, &self.config.solver)?;

        let state = ModelState::new(&classifier, class_weights, y_train.len());
        let blob = state.to_bytes().map_err(|e| FitError::Serialize(e.to_string()))?;
        store.save(&blob)?;

        let engine = InferenceEngine::from_state(state, store.location());

        let x_test = features.select_rows(&split.test);
        let y_test: Vec<u8> = split.test.iter().map(|&i| target[i]).collect();
        let report = ClassificationReport::compute(&y_test, &engine.predict(&x_test));

        info!(
            "Delay model trained in {}ms ({} iterations), held-out accuracy {:.3}",
            start.elapsed().as_millis(),
            summary.iterations,
            report.accuracy
        );

        Ok(FitOutcome {
            engine,
            class_weights,
            report,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            iterations: summary.iterations,
            converged: summary.converged,
        })
    }
}

/// Read-only handle on a trained or loaded delay model.
///
/// Cloning shares the same model; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    inner: Arc<LoadedModel>,
}

#[derive(Debug)]
struct LoadedModel {
    state: ModelState,
    classifier: LogisticRegression,
    source: String,
}

impl InferenceEngine {
    /// Load the persisted model once
    pub fn load(store: &dyn ModelStore) -> Result<Self, InferenceError> {
        let blob = store.load().map_err(|e| match e {
            StorageError::NotFound(location) => InferenceError::ModelUnavailable(location),
            other => InferenceError::Storage(other),
        })?;
        let state = ModelState::from_bytes(&blob)?;
        info!("Loaded delay model from {} ({} training rows)", store.location(), state.trained_rows);
        Ok(Self::from_state(state, store.location()))
    }

    /// Wrap an in-memory model state
    pub fn from_state(state: ModelState, source: impl Into<String>) -> Self {
        let classifier = state.classifier();
        Self {
            inner: Arc::new(LoadedModel {
                state,
                classifier,
                source: source.into(),
            }),
        }
    }

    /// Delay label per row, in row order
    pub fn predict(&self, features: &FeatureMatrix) -> Vec<u8> {
        let labels = self.inner.classifier.predict(features.values());
        debug!("Predicted {} rows", labels.len());
        labels
    }

    /// Probability of delay per row, in row order
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Vec<f64> {
        self.inner.classifier.predict_proba(features.values())
    }

    /// Persisted state of the served model
    pub fn state(&self) -> &ModelState {
        &self.inner.state
    }

    /// Where the model was loaded from
    pub fn source(&self) -> &str {
        &self.inner.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{FeatureVector, FlightRecord, Preprocessor};
    use storage::MemoryModelStore;

    fn labelled_batch() -> (FeatureMatrix, Vec<u8>) {
        let mut vectors = Vec::new();
        let mut target = Vec::new();
        for i in 0..60u8 {
            let mut v = [0u8; 10];
            // MES_12 flights are mostly delayed
            let december = i % 3 == 0;
            v[4] = u8::from(december);
            v[3] = i % 2;
            vectors.push(FeatureVector(v));
            target.push(u8::from(december && i % 9 != 0));
        }
        (FeatureMatrix::from_vectors(&vectors), target)
    }

    #[test]
    fn test_fit_persists_and_predicts() {
        let (features, target) = labelled_batch();
        let store = MemoryModelStore::new();
        let counts = ClassCounts::from_labels(&target);

        let outcome = DelayModel::default().fit(&features, &target, counts, &store).unwrap();
        assert!(!store.is_empty());
        assert_eq!(outcome.train_rows + outcome.test_rows, 60);
        assert_eq!(outcome.test_rows, 20);

        let loaded = InferenceEngine::load(&store).unwrap();
        assert_eq!(loaded.state(), outcome.engine.state());
        assert_eq!(loaded.predict(&features), outcome.engine.predict(&features));

        let december = FeatureMatrix::from_vectors(&[FeatureVector([0, 0, 0, 0, 1, 0, 0, 0, 0, 0])]);
        assert_eq!(loaded.predict(&december), vec![1]);
    }

    #[test]
    fn test_class_weights_use_training_size() {
        let (features, target) = labelled_batch();
        let counts = ClassCounts::from_labels(&target);
        let outcome = DelayModel::default()
            .fit(&features, &target, counts, &MemoryModelStore::new())
            .unwrap();

        let n = outcome.train_rows as f64;
        assert!((outcome.class_weights.positive - counts.n_y0 as f64 / n).abs() < 1e-12);
        assert!((outcome.class_weights.negative - counts.n_y1 as f64 / n).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (features, target) = labelled_batch();
        let counts = ClassCounts::from_labels(&target);
        let model = DelayModel::default();
        let a = model.fit(&features, &target, counts, &MemoryModelStore::new()).unwrap();
        let b = model.fit(&features, &target, counts, &MemoryModelStore::new()).unwrap();
        assert_eq!(a.engine.state(), b.engine.state());
    }

    #[test]
    fn test_shape_mismatch() {
        let (features, mut target) = labelled_batch();
        target.pop();
        let err = DelayModel::default()
            .fit(&features, &target, ClassCounts::from_labels(&target), &MemoryModelStore::new())
            .unwrap_err();
        assert!(matches!(err, FitError::ShapeMismatch { features: 60, target: 59 }));
    }

    #[test]
    fn test_invalid_label() {
        let (features, mut target) = labelled_batch();
        target[7] = 2;
        let err = DelayModel::default()
            .fit(&features, &target, ClassCounts::from_labels(&target), &MemoryModelStore::new())
            .unwrap_err();
        assert!(matches!(err, FitError::InvalidLabel { row: 7, value: 2 }));
    }

    #[test]
    fn test_single_class() {
        let (features, _) = labelled_batch();
        let target = vec![0u8; 60];
        let err = DelayModel::default()
            .fit(&features, &target, ClassCounts::from_labels(&target), &MemoryModelStore::new())
            .unwrap_err();
        assert!(matches!(err, FitError::SingleClass(0)));
    }

    fn three_row_batch(delayed_row: usize) -> Vec<FlightRecord> {
        let mut records = vec![
            FlightRecord::new("Grupo LATAM", "N", 1).with_times("2017-01-01 10:00:00", "2017-01-01 10:01:00"),
            FlightRecord::new("Sky Airline", "N", 1).with_times("2017-01-01 11:00:00", "2017-01-01 11:02:00"),
        ];
        records.insert(
            delayed_row,
            FlightRecord::new("Copa Air", "I", 7).with_times("2017-07-01 09:00:00", "2017-07-01 09:30:00"),
        );
        records
    }

    #[test]
    fn test_three_row_batch_weights() {
        // Seed 42 trains on rows [1, 0] and holds out row 2
        assert_eq!(train_test_split(3, 0.33, 42).unwrap().train, vec![1, 0]);

        let set = Preprocessor::default().preprocess_with_target(&three_row_batch(1)).unwrap();
        assert_eq!(set.target, vec![0, 1, 0]);
        assert_eq!(set.class_counts, ClassCounts { n_y0: 2, n_y1: 1 });

        let outcome = DelayModel::default().fit_set(&set, &MemoryModelStore::new()).unwrap();
        assert_eq!(outcome.train_rows, 2);
        assert_eq!(outcome.test_rows, 1);
        assert_eq!(
            outcome.class_weights,
            ClassWeights {
                negative: 0.5,
                positive: 1.0
            }
        );
        assert_eq!(outcome.engine.state().trained_rows, 2);
    }

    #[test]
    fn test_three_row_batch_single_class_split() {
        let set = Preprocessor::default().preprocess_with_target(&three_row_batch(2)).unwrap();
        assert_eq!(set.class_counts, ClassCounts { n_y0: 2, n_y1: 1 });

        let err = DelayModel::default().fit_set(&set, &MemoryModelStore::new()).unwrap_err();
        assert!(matches!(err, FitError::SingleClass(0)));
    }

    #[test]
    fn test_engine_reports_source() {
        let (features, target) = labelled_batch();
        let store = MemoryModelStore::new();
        let model = DelayModel::new(TrainConfig {
            seed: 7,
            ..Default::default()
        });
        assert_eq!(model.config().seed, 7);

        let outcome = model
            .fit(&features, &target, ClassCounts::from_labels(&target), &store)
            .unwrap();
        assert_eq!(outcome.engine.source(), "memory");
        assert_eq!(InferenceEngine::load(&store).unwrap().source(), "memory");
    }

    #[test]
    fn test_load_without_model() {
        let err = InferenceEngine::load(&MemoryModelStore::new()).unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnavailable(_)));
    }

    #[test]
    fn test_unknown_airline_predicts_single_label() {
        let (features, target) = labelled_batch();
        let store = MemoryModelStore::new();
        DelayModel::default()
            .fit(&features, &target, ClassCounts::from_labels(&target), &store)
            .unwrap();

        let engine = InferenceEngine::load(&store).unwrap();
        let batch = Preprocessor::default()
            .preprocess(&[FlightRecord::new("Avianca", "N", 7)])
            .unwrap();
        let labels = engine.predict(&batch);
        assert_eq!(labels.len(), 1);
        assert!(labels[0] <= 1);
        assert_eq!(engine.predict_proba(&batch).len(), 1);
    }
}
