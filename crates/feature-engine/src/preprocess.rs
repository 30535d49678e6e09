//! Raw Records to Model-Ready Features

use crate::deriver::FeatureDeriver;
use crate::encoder::{FeatureEncoder, FeatureMatrix};
use crate::record::FlightRecord;
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label counts of a training batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Rows labelled 0
    pub n_y0: usize,
    /// Rows labelled 1
    pub n_y1: usize,
}

impl ClassCounts {
    /// Count labels. Values other than 0 and 1 are not counted.
    pub fn from_labels(labels: &[u8]) -> Self {
        labels.iter().fold(Self::default(), |mut acc, &y| {
            match y {
                0 => acc.n_y0 += 1,
                1 => acc.n_y1 += 1,
                _ => {}
            }
            acc
        })
    }
}

/// Features, `delay` target and class counts of a training batch
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: FeatureMatrix,
    pub target: Vec<u8>,
    pub class_counts: ClassCounts,
}

/// Runs feature derivation followed by encoding
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    deriver: FeatureDeriver,
    encoder: FeatureEncoder,
}

impl Preprocessor {
    /// Create a preprocessor
    pub fn new(deriver: FeatureDeriver, encoder: FeatureEncoder) -> Self {
        Self { deriver, encoder }
    }

    /// Prepare a serving batch
    pub fn preprocess(&self, records: &[FlightRecord]) -> Result<FeatureMatrix, FeatureError> {
        self.deriver.derive(records)?;
        self.encoder.encode(records)
    }

    /// Prepare a training batch with the `delay` label as target
    pub fn preprocess_with_target(&self, records: &[FlightRecord]) -> Result<TrainingSet, FeatureError> {
        let derived = self.deriver.derive(records)?;
        let target: Vec<u8> = derived.iter().map(|d| d.delay).collect();
        let class_counts = ClassCounts::from_labels(&target);
        debug!(
            "Training batch of {}: n_y0={}, n_y1={}",
            records.len(),
            class_counts.n_y0,
            class_counts.n_y1
        );

        Ok(TrainingSet {
            features: self.encoder.encode(records)?,
            target,
            class_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FeatureVector;

    fn training_batch() -> Vec<FlightRecord> {
        vec![
            FlightRecord::new("Grupo LATAM", "N", 1)
                .with_times("2017-01-01 23:30:00", "2017-01-01 23:33:00"),
            FlightRecord::new("Sky Airline", "I", 7)
                .with_times("2017-07-20 08:00:00", "2017-07-20 08:40:00"),
            FlightRecord::new("Copa Air", "I", 12)
                .with_times("2017-12-02 14:10:00", "2017-12-02 14:05:00"),
        ]
    }

    #[test]
    fn test_class_counts() {
        let set = Preprocessor::default().preprocess_with_target(&training_batch()).unwrap();
        assert_eq!(set.target, vec![0, 1, 0]);
        assert_eq!(set.class_counts, ClassCounts { n_y0: 2, n_y1: 1 });
        assert_eq!(set.features.nrows(), 3);
    }

    #[test]
    fn test_serving_batch_without_times() {
        let records = vec![FlightRecord::new("Avianca", "N", 7)];
        let features = Preprocessor::default().preprocess(&records).unwrap();
        assert_eq!(features.vectors(), vec![FeatureVector([0, 1, 0, 0, 0, 0, 0, 0, 0, 0])]);
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let preprocessor = Preprocessor::default();
        let batch = training_batch();
        let first = preprocessor.preprocess_with_target(&batch).unwrap();
        let second = preprocessor.preprocess_with_target(&batch).unwrap();
        assert_eq!(first.features, second.features);
        assert_eq!(first.target, second.target);
    }

    #[test]
    fn test_parse_error_propagates() {
        let records = vec![FlightRecord::new("Avianca", "N", 7).with_times("not a date", "2017-01-01 10:00:00")];
        assert!(matches!(
            Preprocessor::default().preprocess(&records),
            Err(FeatureError::Parse { .. })
        ));
    }

    #[test]
    fn test_counts_ignore_unknown_labels() {
        assert_eq!(ClassCounts::from_labels(&[0, 1, 1, 2]), ClassCounts { n_y0: 1, n_y1: 2 });
    }
}
