//! Batch orchestration across facilities and years
//!
//! Enumerates the facilities of each requested year from the discharge-count
//! listing, drives the loader and the aggregation engine per facility, and
//! combines every per-facility summary into one report. Only facility
//! identifier coercion failures are recovered (the facility is skipped);
//! fetch, parse, and store failures abort the run and no manifest is
//! written for it.

use std::path::{Path, PathBuf};

use crate::adapters::soda::{dataset_tag_for_year, DischargeSource, FacilityCountRow};
use crate::adapters::store;
use crate::core::aggregate;
use crate::core::loader::FacilityLoader;
use crate::domain::{Manifest, Result, SparcsError, SummaryTable};

/// File name of the run manifest inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// File name of the combined summary report inside the output directory
pub const COMBINED_SUMMARY_FILE: &str = "combined_summary.csv";

/// Result of a completed batch run
#[derive(Debug)]
pub struct BatchOutcome {
    pub manifest: Manifest,
    pub combined: SummaryTable,
    /// Listing rows skipped because their facility identifier would not
    /// coerce to an integer
    pub skipped: Vec<FacilityCountRow>,
}

/// Orchestrator for a multi-facility, multi-year batch run
pub struct BatchOrchestrator<'a> {
    source: &'a dyn DischargeSource,
    output_dir: PathBuf,
    refresh: bool,
}

/// Cache artifact path for one facility/year record table
pub fn records_path(output_dir: &Path, facility_id: i64, year: i32) -> PathBuf {
    output_dir.join(format!("facility_{facility_id}_{year}.csv"))
}

/// Artifact path for one facility/year summary table
pub fn summary_path(output_dir: &Path, facility_id: i64, year: i32) -> PathBuf {
    output_dir.join(format!("facility_{facility_id}_{year}_summary.csv"))
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(source: &'a dyn DischargeSource, output_dir: impl Into<PathBuf>, refresh: bool) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            refresh,
        }
    }

    /// Run the batch for the given years
    ///
    /// Facilities within a year are processed in descending discharge-count
    /// order (a priority hint, not a correctness requirement). After all
    /// facilities and years, the manifest is written once, every summary
    /// artifact is read back, and the combined report is stacked and
    /// written once.
    pub async fn run(&self, years: &[i32]) -> Result<BatchOutcome> {
        std::fs::create_dir_all(&self.output_dir)?;

        let loader = FacilityLoader::new(self.source);
        let mut manifest = Manifest::new();
        let mut skipped = Vec::new();

        for &year in years {
            let dataset_tag = dataset_tag_for_year(year).ok_or_else(|| {
                SparcsError::Configuration(format!("No dataset tag known for year {year}"))
            })?;

            tracing::info!(year = year, dataset_tag = dataset_tag, "Processing year");

            let mut listing = self.source.fetch_facility_counts(dataset_tag).await?;
            listing.sort_by(|a, b| b.count.cmp(&a.count));

            tracing::info!(
                year = year,
                facilities = listing.len(),
                "Fetched facility listing"
            );

            for row in listing {
                let facility_id = match row.facility_id_as_int() {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::warn!(
                            year = year,
                            facility_id = %row.facility_id,
                            count = row.count,
                            error = %e,
                            "Skipping facility with bad identifier"
                        );
                        skipped.push(row);
                        continue;
                    }
                };

                let records_artifact = records_path(&self.output_dir, facility_id, year);
                let summary_artifact = summary_path(&self.output_dir, facility_id, year);

                let records = loader
                    .load(dataset_tag, facility_id, &records_artifact, self.refresh)
                    .await?;
                let summary = aggregate::summarize(&records)?;
                store::write_summary(&summary_artifact, &summary)?;

                tracing::info!(
                    year = year,
                    facility_id = facility_id,
                    records = records.len(),
                    drg_groups = summary.row_count(),
                    "Completed facility"
                );

                manifest.add_entry(facility_id, year, records_artifact, summary_artifact);
            }
        }

        store::write_manifest(&self.output_dir.join(MANIFEST_FILE), &manifest)?;

        // Combined report: read every produced summary back and stack the
        // rows (no joining), then write once.
        let mut combined = SummaryTable::default();
        for entry in &manifest.entries {
            let summary = store::read_summary(&entry.summary_path)?;
            combined.stack(summary);
        }
        store::write_summary(&self.output_dir.join(COMBINED_SUMMARY_FILE), &combined)?;

        tracing::info!(
            facilities = manifest.len(),
            skipped = skipped.len(),
            combined_rows = combined.row_count(),
            "Batch run complete"
        );

        Ok(BatchOutcome {
            manifest,
            combined,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DischargeRecord, FetchError};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    struct MockSource {
        counts: Vec<FacilityCountRow>,
        records: BTreeMap<i64, Vec<DischargeRecord>>,
    }

    #[async_trait]
    impl DischargeSource for MockSource {
        async fn fetch_facility_records(
            &self,
            _dataset_tag: &str,
            facility_id: i64,
        ) -> std::result::Result<Vec<DischargeRecord>, FetchError> {
            Ok(self.records.get(&facility_id).cloned().unwrap_or_default())
        }

        async fn fetch_facility_counts(
            &self,
            _dataset_tag: &str,
        ) -> std::result::Result<Vec<FacilityCountRow>, FetchError> {
            Ok(self.counts.clone())
        }
    }

    fn count_row(facility_id: &str, count: u64) -> FacilityCountRow {
        serde_json::from_value(serde_json::json!({
            "facility_id": facility_id,
            "count": count,
        }))
        .unwrap()
    }

    fn record(facility_id: i64, drg: (i64, &str), disposition: &str) -> DischargeRecord {
        DischargeRecord {
            row_id: None,
            facility_id,
            facility_name: format!("Facility {facility_id}"),
            apr_drg_code: drg.0,
            apr_drg_description: drg.1.to_string(),
            apr_mdc_code: 1,
            apr_mdc_description: "Bar".to_string(),
            apr_severity_of_illness_code: 2,
            apr_severity_of_illness_description: "Moderate".to_string(),
            length_of_stay: "3".to_string(),
            patient_disposition: disposition.to_string(),
            age_group: "0 to 17".to_string(),
            apr_risk_of_mortality: "Minor".to_string(),
            gender: "F".to_string(),
            source_of_payment_1: "Medicare".to_string(),
            discharge_year: 2014,
            length_of_stay_number: None,
            facility_id_with_description: None,
            apr_drg_code_with_description: None,
            apr_mdc_code_with_description: None,
            apr_severity_of_illness_code_with_description: None,
            in_hospital_mortality: None,
        }
    }

    #[tokio::test]
    async fn test_bad_facility_identifier_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let source = MockSource {
            counts: vec![
                count_row("1", 100),
                count_row("Albany", 50),
                count_row("2", 10),
            ],
            records: BTreeMap::from([
                (1, vec![record(1, (5, "Foo"), "Home")]),
                (2, vec![record(2, (7, "Baz"), "Expired")]),
            ]),
        };

        let orchestrator = BatchOrchestrator::new(&source, dir.path(), false);
        let outcome = orchestrator.run(&[2014]).await.unwrap();

        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].facility_id, "Albany");
        assert_eq!(outcome.manifest.len(), 2);
        assert_eq!(outcome.combined.row_count(), 2);
    }

    #[tokio::test]
    async fn test_facilities_processed_in_descending_count_order() {
        let dir = TempDir::new().unwrap();
        let source = MockSource {
            counts: vec![count_row("1", 10), count_row("2", 500)],
            records: BTreeMap::from([
                (1, vec![record(1, (5, "Foo"), "Home")]),
                (2, vec![record(2, (7, "Baz"), "Home")]),
            ]),
        };

        let orchestrator = BatchOrchestrator::new(&source, dir.path(), false);
        let outcome = orchestrator.run(&[2014]).await.unwrap();

        let order: Vec<i64> = outcome.manifest.entries.iter().map(|e| e.facility_id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_all_artifacts_written() {
        let dir = TempDir::new().unwrap();
        let source = MockSource {
            counts: vec![count_row("1", 10)],
            records: BTreeMap::from([(1, vec![record(1, (5, "Foo"), "Home")])]),
        };

        let orchestrator = BatchOrchestrator::new(&source, dir.path(), false);
        let outcome = orchestrator.run(&[2014]).await.unwrap();

        assert!(records_path(dir.path(), 1, 2014).exists());
        assert!(summary_path(dir.path(), 1, 2014).exists());
        assert!(dir.path().join(MANIFEST_FILE).exists());
        assert!(dir.path().join(COMBINED_SUMMARY_FILE).exists());
        assert_eq!(outcome.manifest.entries[0].records_path, records_path(dir.path(), 1, 2014));
    }

    #[tokio::test]
    async fn test_unknown_year_aborts_the_run() {
        let dir = TempDir::new().unwrap();
        let source = MockSource {
            counts: Vec::new(),
            records: BTreeMap::new(),
        };

        let orchestrator = BatchOrchestrator::new(&source, dir.path(), false);
        let err = orchestrator.run(&[1999]).await.unwrap_err();
        assert!(matches!(err, SparcsError::Configuration(_)));
        // An aborted run never writes a manifest.
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }

    #[tokio::test]
    async fn test_combined_table_stacks_rows_across_facilities() {
        let dir = TempDir::new().unwrap();
        let source = MockSource {
            counts: vec![count_row("1", 10), count_row("2", 5)],
            records: BTreeMap::from([
                (
                    1,
                    vec![
                        record(1, (5, "Foo"), "Home"),
                        record(1, (5, "Foo"), "Expired"),
                    ],
                ),
                (2, vec![record(2, (7, "Baz"), "Home")]),
            ]),
        };

        let orchestrator = BatchOrchestrator::new(&source, dir.path(), false);
        let outcome = orchestrator.run(&[2014]).await.unwrap();

        assert_eq!(outcome.combined.row_count(), 2);
        let keys: Vec<_> = (0..outcome.combined.row_count())
            .map(|i| {
                outcome
                    .combined
                    .cell(i, "apr_drg_code_with_description_")
                    .unwrap()
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(keys, vec!["005 - Foo", "007 - Baz"]);
    }
}
