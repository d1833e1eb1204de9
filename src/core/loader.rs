//! Facility record loading with on-disk caching
//!
//! Produces the per-facility record table either from the cache artifact or
//! by fetching and deriving. The cache policy is existence-gated: if the
//! artifact file is there and no refresh was requested, it is returned
//! verbatim with no network call and no re-derivation, whatever its
//! content.

use std::path::Path;

use crate::adapters::soda::DischargeSource;
use crate::adapters::store;
use crate::core::derive;
use crate::domain::{DischargeRecord, Result};

/// Loader for one facility/year record table
pub struct FacilityLoader<'a> {
    source: &'a dyn DischargeSource,
}

impl<'a> FacilityLoader<'a> {
    pub fn new(source: &'a dyn DischargeSource) -> Self {
        Self { source }
    }

    /// Load the record table for a facility, from cache when possible
    ///
    /// Cache existence alone gates refetching; staleness and content are
    /// not inspected. On a miss (or with `refresh`) the table is fetched,
    /// derived, persisted to `cache_path`, and returned.
    pub async fn load(
        &self,
        dataset_tag: &str,
        facility_id: i64,
        cache_path: &Path,
        refresh: bool,
    ) -> Result<Vec<DischargeRecord>> {
        if cache_path.exists() && !refresh {
            tracing::info!(
                facility_id = facility_id,
                cache_path = %cache_path.display(),
                "Cache hit, loading record artifact"
            );
            return store::read_records(cache_path);
        }

        tracing::info!(
            facility_id = facility_id,
            dataset_tag = dataset_tag,
            refresh = refresh,
            "Cache miss, fetching facility records"
        );

        let records = self
            .source
            .fetch_facility_records(dataset_tag, facility_id)
            .await?;
        let records = derive::derive(records)?;
        store::write_records(cache_path, &records)?;

        Ok(records)
    }
}
