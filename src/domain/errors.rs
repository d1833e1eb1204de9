//! Domain error types
//!
//! This module defines the error hierarchy for the pipeline. All errors are
//! domain-specific and don't expose third-party types (reqwest, csv, serde
//! errors are converted to strings at the adapter boundary).

use thiserror::Error;

/// Main pipeline error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SparcsError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Paged fetch errors (network, HTTP status, malformed payload)
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Field coercion errors during derivation
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Facility identifier coercion errors from the discharge-count listing
    ///
    /// The only error kind the batch orchestrator recovers from.
    #[error("Facility identifier error: {0}")]
    FacilityId(#[from] FacilityIdError),

    /// Artifact store errors (CSV/JSON read and write)
    #[error("Store error: {0}")]
    Store(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors from the paged remote fetch
///
/// Any of these aborts the whole fetch; there is no automatic retry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to reach the dataset service
    #[error("Failed to connect to dataset service: {0}")]
    ConnectionFailed(String),

    /// Service returned a non-success HTTP status
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// A page body could not be decoded into discharge records
    #[error("Malformed page payload: {0}")]
    MalformedPayload(String),
}

/// Errors coercing a record field to its expected type
#[derive(Debug, Error)]
pub enum ParseError {
    /// `length_of_stay` is neither the `"120 +"` sentinel nor an integer
    #[error("Invalid length_of_stay value: {value:?}")]
    LengthOfStay { value: String },

    /// A derived field required by aggregation is missing
    #[error("Missing derived field: {field}")]
    MissingDerivedField { field: &'static str },
}

/// A listed facility identifier that cannot be coerced to an integer
///
/// Caught by the batch orchestrator: the facility is logged and skipped,
/// the batch continues.
#[derive(Debug, Error)]
#[error("Facility identifier {raw:?} is not an integer")]
pub struct FacilityIdError {
    /// The raw identifier as it appeared in the listing row
    pub raw: String,
}

// Conversion from std::io::Error
impl From<std::io::Error> for SparcsError {
    fn from(err: std::io::Error) -> Self {
        SparcsError::Io(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for SparcsError {
    fn from(err: csv::Error) -> Self {
        SparcsError::Store(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SparcsError {
    fn from(err: serde_json::Error) -> Self {
        SparcsError::Store(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SparcsError {
    fn from(err: toml::de::Error) -> Self {
        SparcsError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparcs_error_display() {
        let err = SparcsError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fetch_error_conversion() {
        let fetch_err = FetchError::ConnectionFailed("Network error".to_string());
        let err: SparcsError = fetch_err.into();
        assert!(matches!(err, SparcsError::Fetch(_)));
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = ParseError::LengthOfStay {
            value: "abc".to_string(),
        };
        let err: SparcsError = parse_err.into();
        assert!(matches!(err, SparcsError::Parse(_)));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_facility_id_error_display() {
        let err = FacilityIdError {
            raw: "not-a-number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Facility identifier \"not-a-number\" is not an integer"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SparcsError = io_err.into();
        assert!(matches!(err, SparcsError::Io(_)));
    }

    #[test]
    fn test_sparcs_error_implements_std_error() {
        let err = SparcsError::Other("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
