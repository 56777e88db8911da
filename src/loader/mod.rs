//! Sales data loading.
//!
//! Reads the JSON array of sales records from disk. Records are decoded with
//! serde; nothing beyond the record shape is validated here.

use crate::error::ReportError;
use crate::models::SalesRecord;
use std::path::Path;
use tracing::{debug, info};

/// Load the sales records stored at `path`.
pub fn load_data(path: &Path) -> Result<Vec<SalesRecord>, ReportError> {
    debug!("Reading sales data from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<SalesRecord> =
        serde_json::from_str(&content).map_err(|err| ReportError::Format {
            origin: path.display().to_string(),
            reason: err.to_string(),
        })?;

    info!("Loaded {} sales records from {}", records.len(), path.display());
    Ok(records)
}
