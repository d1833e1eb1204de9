//! Aggregation engine: per-DRG summary of a facility record table
//!
//! Turns one facility/year record table into the wide summary table: base
//! statistics per DRG composite key, five categorical cross-tabulations
//! outer-joined onto them in a fixed order, scalar identifier columns,
//! flattened and relabeled column names, and the mortality rate.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::labels::relabel_column;
use crate::domain::{Cell, DischargeRecord, ParseError, SummaryTable};

/// Join/group key column for every merge step
const KEY_COLUMN: &str = "apr_drg_code_with_description";

/// Cross-tabulation dimensions, in merge order
const CROSSTAB_DIMENSIONS: [&str; 5] = [
    "age_group",
    "apr_severity_of_illness_code_with_description",
    "apr_risk_of_mortality",
    "gender",
    "source_of_payment_1",
];

/// Percentiles reported over the length-of-stay distribution
const LOS_PERCENTILES: [u32; 6] = [1, 5, 25, 75, 95, 99];

/// A column label before flattening: either flat or a (base, statistic) pair
enum ColumnLabel {
    Flat(String),
    Pair(&'static str, &'static str),
}

impl ColumnLabel {
    /// Join pair labels with an underscore; flat labels pass through.
    /// A pair with an empty statistic keeps its trailing underscore.
    fn flatten(&self) -> String {
        match self {
            ColumnLabel::Flat(name) => name.clone(),
            ColumnLabel::Pair(base, stat) => format!("{base}_{stat}"),
        }
    }
}

/// Base statistics for one DRG group
struct BaseStats {
    discharges: i64,
    mortality_sum: i64,
    los_mean: f64,
    los_sum: i64,
    los_median: f64,
    los_percentiles: Vec<f64>,
}

/// Linear-interpolation percentile over a sorted, non-empty sample
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn drg_key(record: &DischargeRecord) -> Result<&str, ParseError> {
    record
        .apr_drg_code_with_description
        .as_deref()
        .ok_or(ParseError::MissingDerivedField {
            field: "apr_drg_code_with_description",
        })
}

fn mortality_flag(record: &DischargeRecord) -> Result<bool, ParseError> {
    record
        .in_hospital_mortality
        .ok_or(ParseError::MissingDerivedField {
            field: "in_hospital_mortality",
        })
}

fn los_number(record: &DischargeRecord) -> Result<u32, ParseError> {
    record
        .length_of_stay_number
        .ok_or(ParseError::MissingDerivedField {
            field: "length_of_stay_number",
        })
}

/// Raw category value for one cross-tabulation dimension
fn dimension_value<'a>(
    record: &'a DischargeRecord,
    dimension: &str,
) -> Result<&'a str, ParseError> {
    match dimension {
        "age_group" => Ok(&record.age_group),
        "apr_severity_of_illness_code_with_description" => record
            .apr_severity_of_illness_code_with_description
            .as_deref()
            .ok_or(ParseError::MissingDerivedField {
                field: "apr_severity_of_illness_code_with_description",
            }),
        "apr_risk_of_mortality" => Ok(&record.apr_risk_of_mortality),
        "gender" => Ok(&record.gender),
        "source_of_payment_1" => Ok(&record.source_of_payment_1),
        other => unreachable!("unknown cross-tabulation dimension: {other}"),
    }
}

/// One two-dimensional frequency cross-tabulation against the DRG key
struct CrossTab {
    /// Observed category values, sorted
    categories: Vec<String>,
    /// DRG key -> category -> count
    counts: BTreeMap<String, BTreeMap<String, i64>>,
}

fn crosstab(records: &[DischargeRecord], dimension: &str) -> Result<CrossTab, ParseError> {
    let mut categories = BTreeSet::new();
    let mut counts: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();

    for record in records {
        let key = drg_key(record)?.to_string();
        let category = dimension_value(record, dimension)?.to_string();
        categories.insert(category.clone());
        *counts.entry(key).or_default().entry(category).or_insert(0) += 1;
    }

    Ok(CrossTab {
        categories: categories.into_iter().collect(),
        counts,
    })
}

/// Group the table by the DRG composite key and compute base statistics
fn base_stats(
    records: &[DischargeRecord],
) -> Result<BTreeMap<String, BaseStats>, ParseError> {
    let mut groups: BTreeMap<String, Vec<&DischargeRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(drg_key(record)?.to_string()).or_default().push(record);
    }

    let mut stats = BTreeMap::new();
    for (key, members) in groups {
        let discharges = members.len() as i64;

        let mut mortality_sum = 0i64;
        let mut los: Vec<f64> = Vec::with_capacity(members.len());
        let mut los_sum = 0i64;
        for record in &members {
            if mortality_flag(record)? {
                mortality_sum += 1;
            }
            let n = los_number(record)?;
            los_sum += i64::from(n);
            los.push(f64::from(n));
        }
        los.sort_by(|a, b| a.total_cmp(b));

        let los_mean = los_sum as f64 / discharges as f64;
        let los_median = percentile(&los, 50.0);
        let los_percentiles = LOS_PERCENTILES
            .iter()
            .map(|p| percentile(&los, f64::from(*p)))
            .collect();

        stats.insert(
            key,
            BaseStats {
                discharges,
                mortality_sum,
                los_mean,
                los_sum,
                los_median,
                los_percentiles,
            },
        );
    }
    Ok(stats)
}

/// Append one cross-tabulation's category columns to the summary table
///
/// Outer-join semantics on the DRG key: every key already present stays,
/// keys only in the cross-tab would be new rows (cannot happen when both
/// sides derive from the same table, but absent combinations still fill
/// with zero). Column-name collisions with an existing column get the
/// deterministic merge suffixes `_x` (existing) and `_y` (incoming).
fn merge_crosstab(table: &mut SummaryTable, keys: &[String], tab: &CrossTab) {
    for category in &tab.categories {
        let mut name = category.clone();
        if let Some(existing) = table.column_index(&name) {
            table.columns[existing] = format!("{name}_x");
            name = format!("{name}_y");
        }
        let values = keys
            .iter()
            .map(|key| {
                let count = tab
                    .counts
                    .get(key)
                    .and_then(|row| row.get(category))
                    .copied()
                    .unwrap_or(0);
                Cell::Int(count)
            })
            .collect();
        table.push_column(name, values);
    }
}

/// Build the wide per-DRG summary table for one facility/year record table
///
/// The step order is fixed for reproducibility of the final column layout:
/// base statistics, the five cross-tabulations merged in declaration order,
/// scalar identifier columns, label flattening and renaming, raw-key drop,
/// and finally the mortality rate.
///
/// # Errors
///
/// Returns [`ParseError::MissingDerivedField`] when the table has not been
/// through the field deriver.
pub fn summarize(records: &[DischargeRecord]) -> Result<SummaryTable, ParseError> {
    if records.is_empty() {
        return Ok(SummaryTable::default());
    }

    // Step 1: grouped base statistics.
    let stats = base_stats(records)?;

    // Step 2: the five cross-tabulations.
    let mut tabs = Vec::with_capacity(CROSSTAB_DIMENSIONS.len());
    for dimension in CROSSTAB_DIMENSIONS {
        tabs.push(crosstab(records, dimension)?);
    }

    // Step 3: outer-join on the DRG key. The key universe is the union of
    // every side's keys, sorted.
    let mut key_set: BTreeSet<String> = stats.keys().cloned().collect();
    for tab in &tabs {
        key_set.extend(tab.counts.keys().cloned());
    }
    let keys: Vec<String> = key_set.into_iter().collect();

    // Pre-flatten column labels for the grouped block: the key carries an
    // empty statistic label, the count is the row-id size.
    let grouped_labels = [
        ColumnLabel::Pair(KEY_COLUMN, ""),
        ColumnLabel::Flat(KEY_COLUMN.to_string()),
        ColumnLabel::Pair("row_id", "size"),
        ColumnLabel::Pair("in_hospital_mortality", "sum"),
        ColumnLabel::Pair("length_of_stay_number", "mean"),
        ColumnLabel::Pair("length_of_stay_number", "sum"),
        ColumnLabel::Pair("length_of_stay_number", "median"),
        ColumnLabel::Pair("length_of_stay_number", "percentile_1"),
        ColumnLabel::Pair("length_of_stay_number", "percentile_5"),
        ColumnLabel::Pair("length_of_stay_number", "percentile_25"),
        ColumnLabel::Pair("length_of_stay_number", "percentile_75"),
        ColumnLabel::Pair("length_of_stay_number", "percentile_95"),
        ColumnLabel::Pair("length_of_stay_number", "percentile_99"),
    ];

    // Step 5 happens here structurally: labels are flattened with an
    // underscore as the columns are laid down.
    let columns: Vec<String> = grouped_labels.iter().map(ColumnLabel::flatten).collect();
    let mut table = SummaryTable::new(columns);

    for key in &keys {
        let mut row = vec![Cell::Text(key.clone()), Cell::Text(key.clone())];
        match stats.get(key) {
            Some(s) => {
                row.push(Cell::Int(s.discharges));
                row.push(Cell::Int(s.mortality_sum));
                row.push(Cell::Float(s.los_mean));
                row.push(Cell::Int(s.los_sum));
                row.push(Cell::Float(s.los_median));
                for value in &s.los_percentiles {
                    row.push(Cell::Float(*value));
                }
            }
            None => {
                // Outer-join fill for a key absent from the grouped side.
                for _ in 0..(table.columns.len() - 2) {
                    row.push(Cell::Int(0));
                }
            }
        }
        table.push_row(row);
    }

    for tab in &tabs {
        merge_crosstab(&mut table, &keys, tab);
    }

    // Step 4: scalar identifier columns from the first observed row (all
    // rows of one facility/year share these values by construction).
    let first = &records[0];
    let facility_label = first.facility_id_with_description.clone().ok_or(
        ParseError::MissingDerivedField {
            field: "facility_id_with_description",
        },
    )?;
    table.push_column(
        "discharge_year",
        vec![Cell::Int(first.discharge_year); keys.len()],
    );
    table.push_column(
        "facility_id_with_description",
        vec![Cell::Text(facility_label); keys.len()],
    );

    // Step 5 (rename) and step 6 (static relabeling), once per finished name.
    table.rename_columns(|name| {
        if name == "row_id_size" {
            "number_of_discharges".to_string()
        } else {
            relabel_column(name)
        }
    });

    // Step 7: the raw join-key column is redundant next to the flattened one.
    table.drop_column(KEY_COLUMN);

    // Step 8: mortality rate. Denominator is always >= 1 because every row
    // came out of the groupby.
    let rate_values: Vec<Cell> = table
        .rows
        .iter()
        .map(|row| {
            let discharges = row[table_column(&table.columns, "number_of_discharges")]
                .as_f64()
                .unwrap_or(0.0);
            let deaths = row[table_column(&table.columns, "in_hospital_mortality_sum")]
                .as_f64()
                .unwrap_or(0.0);
            Cell::Float(deaths / discharges)
        })
        .collect();
    table.push_column("in_hospital_mortality_rate", rate_values);

    Ok(table)
}

fn table_column(columns: &[String], name: &str) -> usize {
    columns
        .iter()
        .position(|c| c == name)
        .expect("summary column laid down earlier in summarize")
}
