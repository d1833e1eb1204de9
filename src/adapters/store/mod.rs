//! On-disk artifact store
//!
//! Flat tabular files: record tables and summary tables as CSV, the run
//! manifest as pretty JSON. Every write goes to a sibling temp file first
//! and is renamed into place, so an artifact is on disk in full or not at
//! all.

use std::fs;
use std::path::Path;

use crate::domain::{Cell, DischargeRecord, Manifest, Result, SparcsError, SummaryTable};

/// Write a record table to a CSV artifact
pub fn write_records(path: &Path, records: &[DischargeRecord]) -> Result<()> {
    let tmp = temp_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| SparcsError::Store(e.to_string()))?;
    }
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "Wrote record artifact");
    Ok(())
}

/// Read a record table back from a CSV artifact, verbatim
pub fn read_records(path: &Path) -> Result<Vec<DischargeRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<DischargeRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Write a summary table to a CSV artifact
pub fn write_summary(path: &Path, table: &SummaryTable) -> Result<()> {
    let tmp = temp_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush().map_err(|e| SparcsError::Store(e.to_string()))?;
    }
    fs::rename(&tmp, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns.len(),
        "Wrote summary artifact"
    );
    Ok(())
}

/// Read a summary table from a CSV artifact
///
/// Cells come back as text; the combined report only stacks rows, so the
/// original renderings pass through unchanged.
pub fn read_summary(path: &Path) -> Result<SummaryTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| SparcsError::Store(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = SummaryTable::new(columns);
    for row in reader.records() {
        let row = row?;
        table.push_row(row.iter().map(|v| Cell::Text(v.to_string())).collect());
    }
    Ok(table)
}

/// Write the run manifest as pretty JSON
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let tmp = temp_path(path);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    tracing::info!(
        path = %path.display(),
        entries = manifest.len(),
        "Wrote run manifest"
    );
    Ok(())
}

fn temp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
