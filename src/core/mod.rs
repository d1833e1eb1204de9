//! Business logic: the facility aggregation pipeline
//!
//! - [`derive`] - normalized column derivation over a raw record table
//! - [`aggregate`] - the per-DRG wide summary table
//! - [`labels`] - static category relabeling table
//! - [`loader`] - cached facility record loading
//! - [`batch`] - orchestration across facilities and years

pub mod aggregate;
pub mod batch;
pub mod derive;
pub mod labels;
pub mod loader;

pub use batch::{BatchOrchestrator, BatchOutcome};
pub use loader::FacilityLoader;
