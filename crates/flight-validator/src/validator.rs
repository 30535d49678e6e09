//! Flight Input Validator

use crate::airline::{Airline, FlightType};
use crate::error::ValidationError;
use feature_engine::FlightRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Flight as received from a caller, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightInput {
    #[serde(rename = "OPERA")]
    pub airline: String,
    #[serde(rename = "TIPOVUELO")]
    pub flight_type: String,
    #[serde(rename = "MES")]
    pub month: i64,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Accepted month range, inclusive
    pub month_range: (i64, i64),
    /// Maximum flights per request
    pub max_batch_size: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            month_range: (1, 12),
            max_batch_size: 1000,
        }
    }
}

/// Checks inbound flights against the accepted domains
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate airline
    pub fn validate_airline(&self, index: usize, value: &str) -> Result<Airline, ValidationError> {
        value.parse().map_err(|_| ValidationError::UnknownAirline {
            index,
            value: value.to_string(),
        })
    }

    /// Validate flight type
    pub fn validate_flight_type(&self, index: usize, value: &str) -> Result<FlightType, ValidationError> {
        value.parse().map_err(|_| ValidationError::UnknownFlightType {
            index,
            value: value.to_string(),
        })
    }

    /// Validate month
    pub fn validate_month(&self, index: usize, value: i64) -> Result<u32, ValidationError> {
        let (min, max) = self.config.month_range;
        if value < min || value > max {
            return Err(ValidationError::MonthOutOfRange { index, value, min, max });
        }
        u32::try_from(value).map_err(|_| ValidationError::MonthOutOfRange { index, value, min, max })
    }

    /// Validate one flight, collecting every field error
    pub fn validate_flight(&self, index: usize, input: &FlightInput) -> Result<FlightRecord, Vec<ValidationError>> {
        let airline = self.validate_airline(index, &input.airline);
        let flight_type = self.validate_flight_type(index, &input.flight_type);
        let month = self.validate_month(index, input.month);

        match (airline, flight_type, month) {
            (Ok(airline), Ok(flight_type), Ok(month)) => {
                Ok(FlightRecord::new(airline.as_str(), flight_type.code(), month))
            }
            (airline, flight_type, month) => Err([airline.err(), flight_type.err(), month.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }

    /// Validate a request batch. Any invalid flight rejects the whole batch.
    pub fn validate_batch(&self, inputs: &[FlightInput]) -> Result<Vec<FlightRecord>, Vec<ValidationError>> {
        if inputs.is_empty() {
            return Err(vec![ValidationError::EmptyBatch]);
        }
        if inputs.len() > self.config.max_batch_size {
            return Err(vec![ValidationError::BatchTooLarge {
                len: inputs.len(),
                max: self.config.max_batch_size,
            }]);
        }

        let mut records = Vec::with_capacity(inputs.len());
        let mut errors = Vec::new();
        for (index, input) in inputs.iter().enumerate() {
            match self.validate_flight(index, input) {
                Ok(record) => records.push(record),
                Err(mut e) => errors.append(&mut e),
            }
        }

        if errors.is_empty() {
            Ok(records)
        } else {
            debug!("Rejected batch of {}: {} validation errors", inputs.len(), errors.len());
            Err(errors)
        }
    }
}
