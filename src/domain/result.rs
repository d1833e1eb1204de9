//! Result type alias for the pipeline
//!
//! This module provides a convenient Result type alias that uses SparcsError
//! as the error type.

use super::errors::SparcsError;

/// Result type alias for pipeline operations
///
/// This is a convenience type alias that uses `SparcsError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use sparcs_drg::domain::result::Result;
/// use sparcs_drg::domain::errors::SparcsError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SparcsError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SparcsError>;
