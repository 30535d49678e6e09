//! One-Hot Encoding onto the Fixed Feature Schema

use crate::record::FlightRecord;
use crate::FeatureError;
use ndarray::{s, Array2, Axis};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 10;

/// Ordered feature schema the classifier is trained against
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "OPERA_Latin American Wings",
    "MES_7",
    "MES_10",
    "OPERA_Grupo LATAM",
    "MES_12",
    "TIPOVUELO_I",
    "MES_4",
    "MES_11",
    "OPERA_Sky Airline",
    "OPERA_Copa Air",
];

/// One row of the fixed feature schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureVector(pub [u8; FEATURE_DIMENSION]);

impl FeatureVector {
    /// Value of a named column, `None` if the column is not in the schema
    pub fn get(&self, column: &str) -> Option<u8> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.0[i])
    }
}

/// Variable-width one-hot table, one column per distinct value seen
#[derive(Debug, Clone)]
pub struct OneHotTable {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl OneHotTable {
    /// One-hot encode a column. Output columns are `<prefix>_<value>` in
    /// ascending value order.
    pub fn dummies<T, I>(prefix: &str, values: I) -> Self
    where
        T: Ord + Display,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let distinct: BTreeSet<&T> = values.iter().collect();
        let index: BTreeMap<&T, usize> = distinct.iter().enumerate().map(|(i, v)| (*v, i)).collect();

        let mut table = Array2::zeros((values.len(), distinct.len()));
        for (row, value) in values.iter().enumerate() {
            table[[row, index[value]]] = 1.0;
        }

        Self {
            columns: distinct.iter().map(|v| format!("{}_{}", prefix, v)).collect(),
            values: table,
        }
    }

    /// Place tables side by side. All tables must have the same row count.
    pub fn concat(tables: &[OneHotTable]) -> Result<Self, FeatureError> {
        let rows = tables.first().map_or(0, |t| t.values.nrows());
        if let Some(bad) = tables.iter().find(|t| t.values.nrows() != rows) {
            return Err(FeatureError::Shape {
                expected: rows,
                actual: bad.values.nrows(),
            });
        }

        let width = tables.iter().map(|t| t.width()).sum();
        let mut values = Array2::zeros((rows, width));
        let mut columns = Vec::with_capacity(width);
        let mut offset = 0;

        for table in tables {
            values
                .slice_mut(s![.., offset..offset + table.width()])
                .assign(&table.values);
            columns.extend(table.columns.iter().cloned());
            offset += table.width();
        }

        Ok(Self { columns, values })
    }

    /// Project onto the fixed schema: missing columns are zero, extra columns dropped
    pub fn reindex(&self) -> FeatureMatrix {
        let positions: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut values = Array2::zeros((self.values.nrows(), FEATURE_DIMENSION));
        for (target, column) in FEATURE_COLUMNS.iter().enumerate() {
            if let Some(&source) = positions.get(column) {
                values.column_mut(target).assign(&self.values.column(source));
            }
        }

        FeatureMatrix { values }
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// Batch of feature vectors over [`FEATURE_COLUMNS`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Wrap a matrix that already follows the schema
    pub fn new(values: Array2<f64>) -> Result<Self, FeatureError> {
        if values.ncols() != FEATURE_DIMENSION {
            return Err(FeatureError::Shape {
                expected: FEATURE_DIMENSION,
                actual: values.ncols(),
            });
        }
        Ok(Self { values })
    }

    /// Build from feature vectors
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let mut values = Array2::zeros((vectors.len(), FEATURE_DIMENSION));
        for (row, vector) in vectors.iter().enumerate() {
            for (col, &v) in vector.0.iter().enumerate() {
                values[[row, col]] = f64::from(v);
            }
        }
        Self { values }
    }

    /// Column names, always [`FEATURE_COLUMNS`]
    pub fn columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// True if the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Underlying matrix
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Rows as feature vectors
    pub fn vectors(&self) -> Vec<FeatureVector> {
        self.values
            .rows()
            .into_iter()
            .map(|row| {
                let mut v = [0u8; FEATURE_DIMENSION];
                for (slot, &x) in v.iter_mut().zip(row.iter()) {
                    *slot = u8::from(x != 0.0);
                }
                FeatureVector(v)
            })
            .collect()
    }

    /// Subset of rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            values: self.values.select(Axis(0), rows),
        }
    }
}

/// Encodes airline, flight type and month onto the fixed schema
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }

    /// One-hot tables for each categorical column, before reindexing
    pub fn one_hot(&self, records: &[FlightRecord]) -> Result<OneHotTable, FeatureError> {
        OneHotTable::concat(&[
            OneHotTable::dummies("OPERA", records.iter().map(|r| r.airline.as_str())),
            OneHotTable::dummies("TIPOVUELO", records.iter().map(|r| r.flight_type.as_str())),
            OneHotTable::dummies("MES", records.iter().map(|r| r.month)),
        ])
    }

    /// Encode a batch onto the fixed schema
    pub fn encode(&self, records: &[FlightRecord]) -> Result<FeatureMatrix, FeatureError> {
        let table = self.one_hot(records)?;
        debug!(
            "Encoding {} records: {} one-hot columns onto {}",
            records.len(),
            table.width(),
            FEATURE_DIMENSION
        );
        Ok(table.reindex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_record_encoding() {
        let records = vec![FlightRecord::new("Avianca", "N", 7)];
        let features = FeatureEncoder::new().encode(&records).unwrap();
        assert_eq!(features.vectors(), vec![FeatureVector([0, 1, 0, 0, 0, 0, 0, 0, 0, 0])]);
    }

    #[test]
    fn test_all_known_columns() {
        let records = vec![
            FlightRecord::new("Latin American Wings", "I", 10),
            FlightRecord::new("Grupo LATAM", "N", 12),
            FlightRecord::new("Sky Airline", "I", 4),
            FlightRecord::new("Copa Air", "N", 11),
        ];
        let vectors = FeatureEncoder::new().encode(&records).unwrap().vectors();

        assert_eq!(vectors[0], FeatureVector([1, 0, 1, 0, 0, 1, 0, 0, 0, 0]));
        assert_eq!(vectors[1], FeatureVector([0, 0, 0, 1, 1, 0, 0, 0, 0, 0]));
        assert_eq!(vectors[2], FeatureVector([0, 0, 0, 0, 0, 1, 1, 0, 1, 0]));
        assert_eq!(vectors[3], FeatureVector([0, 0, 0, 0, 0, 0, 0, 1, 0, 1]));
        assert_eq!(vectors[2].get("OPERA_Sky Airline"), Some(1));
        assert_eq!(vectors[2].get("OPERA_Avianca"), None);
    }

    #[test]
    fn test_dummies_width_follows_batch() {
        let table = OneHotTable::dummies("MES", [7u32, 3, 7, 12]);
        assert_eq!(table.columns(), &["MES_3", "MES_7", "MES_12"]);

        let table = FeatureEncoder::new()
            .one_hot(&[FlightRecord::new("Avianca", "N", 7)])
            .unwrap();
        assert_eq!(table.columns(), &["OPERA_Avianca", "TIPOVUELO_N", "MES_7"]);
    }

    #[test]
    fn test_empty_batch() {
        let features = FeatureEncoder::new().encode(&[]).unwrap();
        assert!(features.is_empty());
        assert_eq!(features.values().ncols(), FEATURE_DIMENSION);
    }

    #[test]
    fn test_matrix_shape_check() {
        assert!(FeatureMatrix::new(Array2::zeros((2, 9))).is_err());
        assert!(FeatureMatrix::new(Array2::zeros((2, FEATURE_DIMENSION))).is_ok());
    }

    #[test]
    fn test_select_rows() {
        let records = vec![
            FlightRecord::new("Copa Air", "N", 1),
            FlightRecord::new("Sky Airline", "N", 1),
        ];
        let features = FeatureEncoder::new().encode(&records).unwrap();
        let picked = features.select_rows(&[1]);
        assert_eq!(picked.vectors()[0].get("OPERA_Sky Airline"), Some(1));
    }

    fn record_strategy() -> impl Strategy<Value = FlightRecord> {
        let airlines = prop::sample::select(vec![
            "Grupo LATAM",
            "Sky Airline",
            "Copa Air",
            "Latin American Wings",
            "Avianca",
            "JetSmart SPA",
            "Iberia",
        ]);
        (airlines, prop::sample::select(vec!["N", "I"]), 1u32..=12)
            .prop_map(|(a, t, m)| FlightRecord::new(a, t, m))
    }

    proptest! {
        #[test]
        fn prop_schema_is_fixed(records in prop::collection::vec(record_strategy(), 0..40)) {
            let features = FeatureEncoder::new().encode(&records).unwrap();
            prop_assert_eq!(features.nrows(), records.len());
            prop_assert_eq!(features.values().ncols(), FEATURE_DIMENSION);
            prop_assert_eq!(features.columns(), &FEATURE_COLUMNS[..]);
            prop_assert!(features.values().iter().all(|&v| v == 0.0 || v == 1.0));
        }

        #[test]
        fn prop_rows_encode_independently(records in prop::collection::vec(record_strategy(), 1..20)) {
            let encoder = FeatureEncoder::new();
            let batch = encoder.encode(&records).unwrap().vectors();
            for (record, row) in records.iter().zip(batch) {
                let single = encoder.encode(std::slice::from_ref(record)).unwrap().vectors();
                prop_assert_eq!(single[0], row);
            }
        }
    }
}
