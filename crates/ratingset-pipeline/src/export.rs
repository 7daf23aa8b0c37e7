//! Final deduplication and CSV export.

use crate::ingest::{AGENCY_COLUMN, DATE_COLUMN, NAME_COLUMN, RATING_COLUMN, SYMBOL_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;
use ratingset_types::{CanonicalName, JoinedObservation, RatioValue, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;

/// Canonical name column of the output.
pub const CLEAN_NAME_COLUMN: &str = "Clean_Name";

/// Effective fiscal year column of the output.
pub const YEAR_COLUMN: &str = "Year";

const RATING_SUFFIX: &str = "_rating";
const RATIO_SUFFIX: &str = "_ratio";

/// Drop rows repeating an earlier (rating date, canonical name) pair.
#[must_use]
pub fn dedup_observations(rows: Vec<JoinedObservation>) -> Vec<JoinedObservation> {
    let mut seen: HashSet<(NaiveDate, CanonicalName)> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|r| seen.insert((r.rating_date, r.matched.canonical.clone())))
        .collect()
}

/// Output column names, made unique by suffixing later duplicates.
#[derive(Debug, Default)]
struct ColumnNames {
    taken: HashSet<String>,
}

impl ColumnNames {
    fn claim(&mut self, name: &str, suffix: &str) -> String {
        let mut candidate = name.to_string();
        while self.taken.contains(&candidate) {
            candidate.push_str(suffix);
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// Ratio field names across all rows, in first-seen order.
fn ratio_field_names(rows: &[JoinedObservation]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for row in rows {
        for (name, _) in &row.ratios.fields {
            if seen.insert(name.as_str()) {
                names.push(name.clone());
            }
        }
    }
    names
}

fn text(name: &str, values: Vec<String>) -> Column {
    Column::from(Series::new(name.into(), values))
}

/// Build a ratio column: floating-point when every present value is numeric,
/// text otherwise.
fn ratio_column(output_name: &str, field: &str, rows: &[JoinedObservation]) -> Column {
    let values: Vec<Option<&RatioValue>> = rows
        .iter()
        .map(|r| r.ratios.field(field).filter(|v| !v.is_null()))
        .collect();

    let numeric = values.iter().flatten().all(|v| v.as_f64().is_some());
    if numeric {
        let floats: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.and_then(RatioValue::as_f64))
            .collect();
        Column::from(Series::new(output_name.into(), floats))
    } else {
        let strings: Vec<Option<String>> = values
            .iter()
            .map(|v| v.map(ToString::to_string))
            .collect();
        Column::from(Series::new(output_name.into(), strings))
    }
}

/// Lay out the joined rows as a DataFrame.
///
/// Columns: `Name`, `Rating Agency Name`, `Rating`, `date`, the extra rating
/// columns, `Clean_Name`, `Symbol`, `Year`, the ratio report date
/// (`date_ratio`) and every ratio field in first-seen order. A column whose
/// name is already taken gets a `_rating` or `_ratio` suffix.
///
/// # Errors
///
/// Returns a Polars error if the frame cannot be assembled.
pub fn to_dataframe(extra_columns: &[String], rows: &[JoinedObservation]) -> Result<DataFrame> {
    let mut names = ColumnNames::default();
    let fixed = [
        NAME_COLUMN,
        AGENCY_COLUMN,
        RATING_COLUMN,
        DATE_COLUMN,
        CLEAN_NAME_COLUMN,
        SYMBOL_COLUMN,
        YEAR_COLUMN,
    ];
    for name in fixed {
        names.claim(name, RATING_SUFFIX);
    }

    let mut columns = vec![
        text(NAME_COLUMN, rows.iter().map(|r| r.matched.rating.name.clone()).collect()),
        text(AGENCY_COLUMN, rows.iter().map(|r| r.matched.rating.agency.clone()).collect()),
        text(RATING_COLUMN, rows.iter().map(|r| r.matched.rating.rating.clone()).collect()),
        text(
            DATE_COLUMN,
            rows.iter().map(|r| r.rating_date.format("%Y-%m-%d").to_string()).collect(),
        ),
    ];

    for (i, extra) in extra_columns.iter().enumerate() {
        let name = names.claim(extra, RATING_SUFFIX);
        columns.push(text(
            &name,
            rows.iter()
                .map(|r| r.matched.rating.extra.get(i).cloned().unwrap_or_default())
                .collect(),
        ));
    }

    columns.push(text(
        CLEAN_NAME_COLUMN,
        rows.iter().map(|r| r.matched.canonical.to_string()).collect(),
    ));
    columns.push(text(SYMBOL_COLUMN, rows.iter().map(|r| r.matched.symbol.clone()).collect()));
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    columns.push(Column::from(Series::new(YEAR_COLUMN.into(), years)));

    let report_date = names.claim(DATE_COLUMN, RATIO_SUFFIX);
    columns.push(text(
        &report_date,
        rows.iter().map(|r| r.ratios.date.format("%Y-%m-%d").to_string()).collect(),
    ));

    for field in ratio_field_names(rows) {
        let name = names.claim(&field, RATIO_SUFFIX);
        columns.push(ratio_column(&name, &field, rows));
    }

    Ok(DataFrame::new(columns)?)
}

/// Write a DataFrame as CSV with a header row, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    tracing::info!(path = %path.display(), rows = df.height(), "wrote dataset");
    Ok(())
}
