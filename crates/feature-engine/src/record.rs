//! Flight Record

use serde::{Deserialize, Serialize};

/// One flight observation.
///
/// Field names on the wire follow the flight dataset columns. The timestamps
/// are only present for training and backfill batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Operating airline name
    #[serde(rename = "OPERA")]
    pub airline: String,
    /// Flight type code (`N` domestic, `I` international)
    #[serde(rename = "TIPOVUELO")]
    pub flight_type: String,
    /// Month of operation (1-12)
    #[serde(rename = "MES")]
    pub month: u32,
    /// Scheduled departure, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "Fecha-I", default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<String>,
    /// Actual departure, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "Fecha-O", default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl FlightRecord {
    /// Create a serving-time record without timestamps
    pub fn new(airline: impl Into<String>, flight_type: impl Into<String>, month: u32) -> Self {
        Self {
            airline: airline.into(),
            flight_type: flight_type.into(),
            month,
            scheduled: None,
            actual: None,
        }
    }

    /// Attach scheduled and actual departure timestamps
    pub fn with_times(mut self, scheduled: impl Into<String>, actual: impl Into<String>) -> Self {
        self.scheduled = Some(scheduled.into());
        self.actual = Some(actual.into());
        self
    }
}
