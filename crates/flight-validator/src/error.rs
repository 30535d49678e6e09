//! Validation Error Types

use serde::Serialize;
use thiserror::Error;

/// Errors during flight validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Airline outside the accepted set
    #[error("flight {index}: unknown OPERA '{value}'")]
    UnknownAirline { index: usize, value: String },

    /// Flight type other than `N` or `I`
    #[error("flight {index}: invalid TIPOVUELO '{value}', expected 'N' or 'I'")]
    UnknownFlightType { index: usize, value: String },

    /// Month outside the calendar
    #[error("flight {index}: MES {value} is out of range [{min}, {max}]")]
    MonthOutOfRange {
        index: usize,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Request without flights
    #[error("no flights in request")]
    EmptyBatch,

    /// Request over the configured batch limit
    #[error("{len} flights exceed the batch limit of {max}")]
    BatchTooLarge { len: usize, max: usize },
}

/// One entry of a validation failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Path to the offending value, e.g. `["flights", "0", "MES"]`
    pub loc: Vec<String>,
    pub msg: String,
}

impl ValidationError {
    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::UnknownAirline { .. } => Some("OPERA"),
            ValidationError::UnknownFlightType { .. } => Some("TIPOVUELO"),
            ValidationError::MonthOutOfRange { .. } => Some("MES"),
            ValidationError::EmptyBatch | ValidationError::BatchTooLarge { .. } => None,
        }
    }

    /// Index of the offending flight, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::UnknownAirline { index, .. }
            | ValidationError::UnknownFlightType { index, .. }
            | ValidationError::MonthOutOfRange { index, .. } => Some(*index),
            ValidationError::EmptyBatch | ValidationError::BatchTooLarge { .. } => None,
        }
    }

    /// Response entry for this error
    pub fn detail(&self) -> ErrorDetail {
        let mut loc = vec!["flights".to_string()];
        if let Some(index) = self.index() {
            loc.push(index.to_string());
        }
        if let Some(field) = self.field() {
            loc.push(field.to_string());
        }
        ErrorDetail {
            loc,
            msg: self.to_string(),
        }
    }
}
