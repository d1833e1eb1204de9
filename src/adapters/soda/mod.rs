//! SODA dataset service adapter
//!
//! Everything that talks to the remote discharge dataset lives here: the
//! [`DischargeSource`] trait the pipeline depends on, the [`SodaClient`]
//! HTTP implementation, and the static year-to-dataset-tag table.

pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::domain::{DischargeRecord, FetchError};

pub use client::{SodaClient, DEFAULT_ORDER_BY, DEFAULT_PAGE_SIZE};
pub use models::FacilityCountRow;

/// Abstract paged discharge data source
///
/// The pipeline depends on this trait rather than the HTTP client directly,
/// so the loader and orchestrator can run against an in-memory source in
/// tests.
#[async_trait]
pub trait DischargeSource: Send + Sync {
    /// Fetch the complete record table for one facility in one dataset
    async fn fetch_facility_records(
        &self,
        dataset_tag: &str,
        facility_id: i64,
    ) -> Result<Vec<DischargeRecord>, FetchError>;

    /// Fetch the facility discharge-count listing for one dataset
    async fn fetch_facility_counts(
        &self,
        dataset_tag: &str,
    ) -> Result<Vec<FacilityCountRow>, FetchError>;
}

/// Fixed year-to-dataset-tag table for the SPARCS de-identified datasets
pub const DATASET_TAGS: &[(i32, &str)] = &[
    (2009, "q6hk-esrj"),
    (2010, "mtfm-rxf4"),
    (2011, "pyhr-5eas"),
    (2012, "u4ud-w55t"),
    (2013, "npsr-cm47"),
    (2014, "rmwa-zns4"),
];

/// Dataset tag for a discharge year, when one is known
pub fn dataset_tag_for_year(year: i32) -> Option<&'static str> {
    DATASET_TAGS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, tag)| *tag)
}
