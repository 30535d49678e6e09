//! Calendar and Delay Feature Derivation

use crate::record::FlightRecord;
use crate::FeatureError;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Timestamp format used by both departure fields
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default delay threshold in minutes
pub const DEFAULT_DELAY_THRESHOLD_MINUTES: f64 = 15.0;

const fn hm(hour: u32, minute: u32) -> u32 {
    hour * 3600 + minute * 60
}

// Open intervals in seconds since midnight. Instants exactly on a bound
// (and the seconds between `xx:59` and the next bucket) fall in no bucket.
const MORNING: (u32, u32) = (hm(5, 0), hm(11, 59));
const AFTERNOON: (u32, u32) = (hm(12, 0), hm(18, 59));
const EVENING: (u32, u32) = (hm(19, 0), hm(23, 59));
const NIGHT: (u32, u32) = (hm(0, 0), hm(4, 59));

/// High season windows as inclusive (month, day) ranges within one year
const HIGH_SEASON: [((u32, u32), (u32, u32)); 4] = [
    ((12, 15), (12, 31)),
    ((1, 1), (3, 3)),
    ((7, 15), (7, 31)),
    ((9, 11), (9, 30)),
];

/// Time-of-day bucket of the scheduled departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodDay {
    /// Between 05:00 and 11:59
    Morning,
    /// Between 12:00 and 18:59
    Afternoon,
    /// Between 19:00 and 04:59
    Night,
}

impl PeriodDay {
    /// Label used in the flight dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodDay::Morning => "mañana",
            PeriodDay::Afternoon => "tarde",
            PeriodDay::Night => "noche",
        }
    }
}

/// Features derived from the departure timestamps of one record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedFeatures {
    /// Time-of-day bucket, `None` when no bucket matches
    pub period_day: Option<PeriodDay>,
    /// 1 if the scheduled date is in a high season window
    pub high_season: u8,
    /// Actual minus scheduled departure, in minutes
    pub min_diff: f64,
    /// 1 if `min_diff` exceeds the delay threshold
    pub delay: u8,
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

fn within(secs: u32, (lo, hi): (u32, u32)) -> bool {
    secs > lo && secs < hi
}

/// Time-of-day bucket with strictly exclusive bounds
pub fn period_day(timestamp: &NaiveDateTime) -> Option<PeriodDay> {
    let secs = timestamp.time().num_seconds_from_midnight();

    if within(secs, MORNING) {
        Some(PeriodDay::Morning)
    } else if within(secs, AFTERNOON) {
        Some(PeriodDay::Afternoon)
    } else if within(secs, EVENING) || within(secs, NIGHT) {
        Some(PeriodDay::Night)
    } else {
        None
    }
}

/// 1 if the date falls in any high season window of its own year, else 0
pub fn is_high_season(timestamp: &NaiveDateTime) -> u8 {
    let day = (timestamp.month(), timestamp.day());
    let high = HIGH_SEASON
        .iter()
        .any(|&(start, end)| day >= start && day <= end);
    u8::from(high)
}

/// Signed gap between actual and scheduled departure, in minutes
pub fn min_diff(scheduled: &NaiveDateTime, actual: &NaiveDateTime) -> f64 {
    (*actual - *scheduled).num_milliseconds() as f64 / 60_000.0
}

/// Derives calendar and delay features from flight timestamps
#[derive(Debug, Clone)]
pub struct FeatureDeriver {
    delay_threshold_minutes: f64,
}

impl Default for FeatureDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_THRESHOLD_MINUTES)
    }
}

impl FeatureDeriver {
    /// Create a deriver with the given delay threshold
    pub fn new(delay_threshold_minutes: f64) -> Self {
        Self { delay_threshold_minutes }
    }

    /// Delay threshold in minutes
    pub fn delay_threshold_minutes(&self) -> f64 {
        self.delay_threshold_minutes
    }

    /// Derive features for a whole batch, aligned by row.
    ///
    /// A batch with no scheduled timestamps at all gets zero defaults on every
    /// row. Once any row carries one, every row must carry both timestamps.
    pub fn derive(&self, records: &[FlightRecord]) -> Result<Vec<DerivedFeatures>, FeatureError> {
        if !records.iter().any(|r| r.scheduled.is_some()) {
            debug!("No scheduled timestamps in batch of {}, using defaults", records.len());
            return Ok(vec![DerivedFeatures::default(); records.len()]);
        }

        records
            .iter()
            .enumerate()
            .map(|(row, record)| self.derive_record(row, record))
            .collect()
    }

    fn derive_record(&self, row: usize, record: &FlightRecord) -> Result<DerivedFeatures, FeatureError> {
        let scheduled = Self::timestamp(row, "Fecha-I", record.scheduled.as_deref())?;
        let actual = Self::timestamp(row, "Fecha-O", record.actual.as_deref())?;
        let min_diff = min_diff(&scheduled, &actual);

        Ok(DerivedFeatures {
            period_day: period_day(&scheduled),
            high_season: is_high_season(&scheduled),
            min_diff,
            delay: u8::from(min_diff > self.delay_threshold_minutes),
        })
    }

    fn timestamp(row: usize, field: &'static str, value: Option<&str>) -> Result<NaiveDateTime, FeatureError> {
        let value = value.ok_or(FeatureError::MissingTimestamp { row, field })?;
        parse_timestamp(value).map_err(|source| FeatureError::Parse {
            row,
            field,
            value: value.to_string(),
            source,
        })
    }
}
