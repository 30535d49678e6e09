//! Flight Dataset Loading

use crate::record::FlightRecord;
use crate::FeatureError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Load flight records from a CSV file with a header row.
///
/// Columns other than `OPERA`, `TIPOVUELO`, `MES`, `Fecha-I` and `Fecha-O`
/// are ignored.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<FlightRecord>, FeatureError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FeatureError::Dataset(format!("{}: {}", path.display(), e)))?;
    let records = read_csv(BufReader::new(file))?;
    info!("Loaded {} flight records from {}", records.len(), path.display());
    Ok(records)
}

/// Read flight records from any CSV source with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<FlightRecord>, FeatureError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    reader
        .deserialize()
        .enumerate()
        .map(|(row, result)| {
            result.map_err(|e| FeatureError::Dataset(format!("row {}: {}", row, e)))
        })
        .collect()
}
