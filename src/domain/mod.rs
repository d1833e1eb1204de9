//! Domain models and types for the discharge aggregation pipeline.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record model** ([`DischargeRecord`]) - one discharge event, raw plus
//!   derived fields
//! - **Summary table** ([`SummaryTable`], [`Cell`]) - the wide per-DRG
//!   aggregate result with a dynamic column collection
//! - **Manifest** ([`Manifest`]) - artifact locations per facility/year
//! - **Error types** ([`SparcsError`], [`FetchError`], [`ParseError`],
//!   [`FacilityIdError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SparcsError>`]:
//!
//! ```rust
//! use sparcs_drg::domain::{Result, SparcsError};
//!
//! fn example() -> Result<()> {
//!     Err(SparcsError::Configuration("missing years".to_string()))
//! }
//! ```

pub mod errors;
pub mod manifest;
pub mod record;
pub mod result;
pub mod table;

// Re-export commonly used types for convenience
pub use errors::{FacilityIdError, FetchError, ParseError, SparcsError};
pub use manifest::{Manifest, ManifestEntry};
pub use record::DischargeRecord;
pub use result::Result;
pub use table::{Cell, SummaryTable};
