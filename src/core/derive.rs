//! Field derivation over a raw record table
//!
//! Derives the normalized columns the aggregation engine groups and
//! tabulates on: the parsed length-of-stay number, the four composite
//! `<code> - <description>` identifier fields, and the in-hospital mortality
//! flag. All derivations are pure functions of existing columns; the table
//! is mutated in place and handed back.

use crate::domain::{DischargeRecord, ParseError};

/// Literal sentinel the dataset uses for stays capped at 120 days
pub const LENGTH_OF_STAY_CAP_SENTINEL: &str = "120 +";

/// Disposition value that marks an in-hospital death
pub const EXPIRED_DISPOSITION: &str = "Expired";

/// Zero-padding widths for the composite identifier fields.
/// Fixed contract values, not configurable per call.
pub const FACILITY_ID_PADDING: usize = 4;
pub const APR_DRG_PADDING: usize = 3;
pub const APR_MDC_PADDING: usize = 4;
pub const APR_SEVERITY_PADDING: usize = 1;

/// Build a `<zero-padded code> - <description>` composite field
///
/// The code is left-padded with zeros and then cut to the trailing
/// `padding` characters. A code whose digit count exceeds the padding width
/// silently keeps only its trailing digits; the truncation is part of the
/// observable contract and must not be "fixed" here.
pub fn composite_field(code: i64, description: &str, padding: usize) -> String {
    let padded = format!("{}{}", "0".repeat(padding), code);
    let tail = &padded[padded.len() - padding..];
    format!("{tail} - {description}")
}

/// Parse the raw `length_of_stay` column value
///
/// The `"120 +"` sentinel maps to 120; everything else must be an integer.
fn parse_length_of_stay(raw: &str) -> Result<u32, ParseError> {
    if raw == LENGTH_OF_STAY_CAP_SENTINEL {
        return Ok(120);
    }
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ParseError::LengthOfStay {
            value: raw.to_string(),
        })
}

/// Derive all normalized columns on a record table
///
/// Fills `length_of_stay_number`, the four composite identifier fields, and
/// `in_hospital_mortality` on every record. Idempotent: re-running replaces
/// the derived values with identical ones.
///
/// # Errors
///
/// Returns [`ParseError::LengthOfStay`] when any record carries a
/// `length_of_stay` that is neither the cap sentinel nor an integer; the
/// whole derivation fails (no partial results are handed back).
pub fn derive(mut records: Vec<DischargeRecord>) -> Result<Vec<DischargeRecord>, ParseError> {
    for record in &mut records {
        record.length_of_stay_number = Some(parse_length_of_stay(&record.length_of_stay)?);

        record.facility_id_with_description = Some(composite_field(
            record.facility_id,
            &record.facility_name,
            FACILITY_ID_PADDING,
        ));
        record.apr_drg_code_with_description = Some(composite_field(
            record.apr_drg_code,
            &record.apr_drg_description,
            APR_DRG_PADDING,
        ));
        record.apr_mdc_code_with_description = Some(composite_field(
            record.apr_mdc_code,
            &record.apr_mdc_description,
            APR_MDC_PADDING,
        ));
        record.apr_severity_of_illness_code_with_description = Some(composite_field(
            record.apr_severity_of_illness_code,
            &record.apr_severity_of_illness_description,
            APR_SEVERITY_PADDING,
        ));

        record.in_hospital_mortality = Some(record.patient_disposition == EXPIRED_DISPOSITION);
    }
    Ok(records)
}
