//! Discharge record model
//!
//! One `DischargeRecord` is a single inpatient discharge event as returned by
//! the SPARCS de-identified dataset. Raw fields mirror the remote column
//! names; derived fields are filled by the field deriver and persisted in the
//! cached CSV artifact alongside the raw fields.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A single inpatient discharge event
///
/// The same struct is used for the JSON page payloads coming off the wire
/// and for the CSV cache artifact, so numeric code fields accept either a
/// JSON number or a string (the dataset service emits both).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DischargeRecord {
    /// Stable system row identifier, used as the paging order key
    #[serde(rename = ":id", default)]
    pub row_id: Option<String>,

    #[serde(deserialize_with = "i64_from_any")]
    pub facility_id: i64,
    pub facility_name: String,

    #[serde(deserialize_with = "i64_from_any")]
    pub apr_drg_code: i64,
    pub apr_drg_description: String,

    #[serde(deserialize_with = "i64_from_any")]
    pub apr_mdc_code: i64,
    pub apr_mdc_description: String,

    #[serde(deserialize_with = "i64_from_any")]
    pub apr_severity_of_illness_code: i64,
    pub apr_severity_of_illness_description: String,

    /// Raw length of stay; the literal `"120 +"` means a capped stay
    pub length_of_stay: String,
    pub patient_disposition: String,
    pub age_group: String,
    pub apr_risk_of_mortality: String,
    pub gender: String,
    pub source_of_payment_1: String,

    #[serde(deserialize_with = "i64_from_any")]
    pub discharge_year: i64,

    // Derived fields, absent until the field deriver runs.
    #[serde(default)]
    pub length_of_stay_number: Option<u32>,
    #[serde(default)]
    pub facility_id_with_description: Option<String>,
    #[serde(default)]
    pub apr_drg_code_with_description: Option<String>,
    #[serde(default)]
    pub apr_mdc_code_with_description: Option<String>,
    #[serde(default)]
    pub apr_severity_of_illness_code_with_description: Option<String>,
    #[serde(default)]
    pub in_hospital_mortality: Option<bool>,
}

/// Deserialize an integer field that may arrive as a JSON number, a JSON
/// float, or a string (including the CSV cache, where everything is text)
fn i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct AnyIntVisitor;

    impl de::Visitor<'_> for AnyIntVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an integer, a float, or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("integer out of range: {v}")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            Ok(v as i64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            let trimmed = v.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            // The service occasionally renders codes as "123.0"
            trimmed
                .parse::<f64>()
                .map(|f| f as i64)
                .map_err(|_| E::custom(format!("not a numeric value: {v:?}")))
        }
    }

    deserializer.deserialize_any(AnyIntVisitor)
}
