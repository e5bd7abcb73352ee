use std::fs;
use std::path::Path;

use log::info;

use crate::error::CacheError;
use crate::record::{ArtworkRecord, Dataset};

/// Write the dataset snapshot as CSV, creating parent directories as needed.
pub fn save(dataset: &Dataset, path: &Path) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in dataset.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Saved {} records to {}", dataset.len(), path.display());
    Ok(())
}

/// Load the dataset snapshot. A missing file is a distinct, actionable
/// failure telling the operator to run the harvest, not a generic I/O error.
pub fn load(path: &Path) -> Result<Dataset, CacheError> {
    if !path.exists() {
        return Err(CacheError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: ArtworkRecord = result?;
        records.push(record);
    }

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(Dataset::new(records))
}
