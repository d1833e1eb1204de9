//! Batch run manifest
//!
//! The manifest maps every processed `(facility_id, year)` pair to the
//! artifact paths the run produced. It is built in memory during the batch
//! run and written to disk exactly once, after all facilities and years have
//! been processed. An aborted run never writes a manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Artifact locations for one processed facility/year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub facility_id: i64,
    pub year: i32,
    /// Cached raw record table (derived columns included)
    pub records_path: PathBuf,
    /// Per-facility wide summary table
    pub summary_path: PathBuf,
}

/// Mapping from processed facility/year keys to produced artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Identifier of the batch run that produced these artifacts
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(
        &mut self,
        facility_id: i64,
        year: i32,
        records_path: PathBuf,
        summary_path: PathBuf,
    ) {
        self.entries.push(ManifestEntry {
            facility_id,
            year,
            records_path,
            summary_path,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}
