//! Static category-label lookup table
//!
//! Cross-tabulation columns are named after raw category values ("F",
//! "Medicare", "0 - nan"). This table maps each known raw value to a
//! human-readable prefix; relabeling is a pure function over finished column
//! names, applied once per name by exact string match. Values not in the
//! table keep their raw name.

/// Ordered list of (raw category value, prefix) pairs
///
/// The rendered label is `"<prefix>: <raw value>"`.
pub const APR_FIELD_SUFFIXES: &[(&str, &str)] = &[
    // age_group categories
    ("0 to 17", "age group"),
    ("18 to 29", "age group"),
    ("30 to 49", "age group"),
    ("50 to 69", "age group"),
    ("70 or Older", "age group"),
    // apr_severity_of_illness_code_with_description categories
    ("0 - nan", "APR severity"),
    ("1 - Minor", "APR severity"),
    ("2 - Moderate", "APR severity"),
    ("3 - Major", "APR severity"),
    ("4 - Extreme", "APR severity"),
    // apr_risk_of_mortality categories
    ("Minor", "APR risk of mortality"),
    ("Moderate", "APR risk of mortality"),
    ("Major", "APR risk of mortality"),
    ("Extreme", "APR risk of mortality"),
    // gender categories
    ("F", "gender"),
    ("M", "gender"),
    ("U", "gender"),
    // source_of_payment_1 categories
    ("Medicare", "payment source"),
    ("Medicaid", "payment source"),
    ("Private Health Insurance", "payment source"),
    ("Blue Cross/Blue Shield", "payment source"),
    ("Self-Pay", "payment source"),
    ("Workers Compensation", "payment source"),
    ("Federal/State/Local/VA", "payment source"),
    ("Department of Corrections", "payment source"),
    ("Managed Care, Unspecified", "payment source"),
    ("Miscellaneous/Other", "payment source"),
    ("Unknown", "payment source"),
];

/// Relabel a finished column name
///
/// Exact-match lookup against [`APR_FIELD_SUFFIXES`]; unknown names pass
/// through unchanged.
pub fn relabel_column(name: &str) -> String {
    for (raw, prefix) in APR_FIELD_SUFFIXES {
        if *raw == name {
            return format!("{prefix}: {raw}");
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("F", "gender: F")]
    #[test_case("0 - nan", "APR severity: 0 - nan")]
    #[test_case("70 or Older", "age group: 70 or Older")]
    #[test_case("Major", "APR risk of mortality: Major")]
    #[test_case("Medicare", "payment source: Medicare")]
    fn test_known_values_get_prefix(raw: &str, expected: &str) {
        assert_eq!(relabel_column(raw), expected);
    }

    #[test]
    fn test_unknown_value_keeps_raw_name() {
        assert_eq!(relabel_column("number_of_discharges"), "number_of_discharges");
        assert_eq!(relabel_column("3 - Major"), "APR severity: 3 - Major");
        // Severity composite and bare risk values are distinct strings, so
        // the exact match cannot confuse the two dimensions.
        assert_eq!(relabel_column("Major_x"), "Major_x");
    }

    #[test]
    fn test_lookup_is_exact_match_only() {
        assert_eq!(relabel_column("f"), "f");
        assert_eq!(relabel_column(" F"), " F");
    }
}
