//! Feature Engineering Engine
//!
//! Derives calendar and delay features from flight timestamps and encodes
//! airline, flight type and month onto the fixed schema the delay classifier
//! is trained against.

mod dataset;
mod deriver;
mod encoder;
mod preprocess;
mod record;

pub use dataset::{load_csv, read_csv};
pub use deriver::{
    is_high_season, min_diff, parse_timestamp, period_day, DerivedFeatures, FeatureDeriver, PeriodDay,
    DEFAULT_DELAY_THRESHOLD_MINUTES, TIMESTAMP_FORMAT,
};
pub use encoder::{FeatureEncoder, FeatureMatrix, FeatureVector, OneHotTable, FEATURE_COLUMNS, FEATURE_DIMENSION};
pub use preprocess::{ClassCounts, Preprocessor, TrainingSet};
pub use record::FlightRecord;

use thiserror::Error;

/// Errors during feature preparation
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("row {row}: cannot parse {field} timestamp '{value}': {source}")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("row {row}: missing {field} timestamp")]
    MissingTimestamp { row: usize, field: &'static str },
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },
    #[error("Dataset error: {0}")]
    Dataset(String),
}
