//! Tab-separated table reading and writing.
//!
//! Inputs and outputs are tab-separated with a header row. Missing numeric
//! values are written as empty cells.

use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

use crate::core::{FeatureTable, Recording};
use crate::error::TableError;

/// Read a tab-separated table with a header row.
///
/// Rows whose field count differs from the header are rejected.
pub fn read_recording(path: impl AsRef<Path>) -> Result<Recording, TableError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|e| TableError::csv(path, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| TableError::csv(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut recording = Recording::new(columns);
    for result in reader.records() {
        let record = result.map_err(|e| TableError::csv(path, e))?;
        recording.push_row(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(recording)
}

/// Write a recording as a tab-separated table.
pub fn write_recording(path: impl AsRef<Path>, recording: &Recording) -> Result<(), TableError> {
    let path = path.as_ref();
    let mut writer = open_writer(path)?;

    writer
        .write_record(recording.columns())
        .map_err(|e| TableError::csv(path, e))?;
    for row in recording.rows() {
        writer
            .write_record(row)
            .map_err(|e| TableError::csv(path, e))?;
    }

    writer.flush().map_err(|e| TableError::io(path, e))
}

/// Write a feature table: dimensions then metadata, one row per window.
pub fn write_feature_table(path: impl AsRef<Path>, table: &FeatureTable) -> Result<(), TableError> {
    let path = path.as_ref();
    let mut writer = open_writer(path)?;

    writer
        .write_record(table.header())
        .map_err(|e| TableError::csv(path, e))?;

    for row in &table.rows {
        let record = row
            .values
            .iter()
            .map(|&v| format_value(v))
            .chain(row.metadata.iter().cloned());
        writer
            .write_record(record)
            .map_err(|e| TableError::csv(path, e))?;
    }

    writer.flush().map_err(|e| TableError::io(path, e))
}

/// Shortest round-trip formatting; NaN becomes an empty cell.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>, TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TableError::io(parent, e))?;
    }

    WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| TableError::csv(path, e))
}
