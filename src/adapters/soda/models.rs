//! Wire models for the SODA dataset service
//!
//! Row payloads for the facility discharge-count listing. Full discharge
//! rows deserialize straight into [`crate::domain::DischargeRecord`].

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// One row of the facility discharge-count listing
///
/// The facility identifier is kept as the raw string it arrived as: whether
/// it can be coerced to an integer is the batch orchestrator's decision (a
/// bad identifier skips the facility rather than failing the listing fetch).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacilityCountRow {
    /// Raw facility identifier, uncoerced
    #[serde(deserialize_with = "raw_string")]
    pub facility_id: String,

    /// Number of discharge rows for this facility
    #[serde(deserialize_with = "u64_from_any")]
    pub count: u64,
}

impl FacilityCountRow {
    /// Coerce the raw identifier to an integer facility id
    pub fn facility_id_as_int(&self) -> Result<i64, crate::domain::FacilityIdError> {
        let trimmed = self.facility_id.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(n);
        }
        // Aggregate endpoints sometimes render ids as "1456.0"
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.fract() == 0.0 {
                return Ok(f as i64);
            }
        }
        Err(crate::domain::FacilityIdError {
            raw: self.facility_id.clone(),
        })
    }
}

/// Accept a JSON string or number and keep its raw textual rendering
fn raw_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct RawStringVisitor;

    impl de::Visitor<'_> for RawStringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(RawStringVisitor)
}

/// Accept a JSON number or numeric string as a count
fn u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl de::Visitor<'_> for CountVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer or numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative count: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("not a count: {v:?}")))
        }
    }

    deserializer.deserialize_any(CountVisitor)
}
