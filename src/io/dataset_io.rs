use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::state::data_model::Dataset;

#[derive(Debug, Error)]
pub enum DatasetIoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dataset root is not an object with `columns` and `rows`")]
    NotADataset,
}

/// Parses the `{ columns, rows }` document handed over by the data loader.
pub fn parse_dataset(source: &str) -> Result<Dataset, DatasetIoError> {
    let value: Value = serde_json::from_str(source)?;
    let is_dataset = value
        .as_object()
        .map(|map| map.contains_key("columns") || map.contains_key("rows"))
        .unwrap_or(false);
    if !is_dataset {
        return Err(DatasetIoError::NotADataset);
    }
    Ok(serde_json::from_value(value)?)
}

pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetIoError> {
    let content = fs::read_to_string(path)?;
    let dataset = parse_dataset(&content)?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.rows.len(),
        columns = dataset.columns.len(),
        "read dataset file"
    );
    Ok(dataset)
}
