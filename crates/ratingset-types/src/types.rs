//! Records passed between pipeline stages.

use crate::CanonicalName;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ticker symbol such as "AAPL".
pub type Symbol = String;

/// One row of the ratings history table.
///
/// The four columns the pipeline reads are typed fields. Every other column
/// of the source row is kept in `extra`, in header order, so exact-duplicate
/// detection and the final export see the whole row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Company name as written by the agency.
    pub name: String,
    /// Issuing rating agency.
    pub agency: String,
    /// Letter grade, e.g. "AA-".
    pub rating: String,
    /// Rating date exactly as it appears in the source.
    pub date: String,
    /// Remaining columns, aligned with [`RatingsTable::extra_columns`].
    pub extra: Vec<String>,
}

/// The ratings history table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingsTable {
    /// Header names of the columns stored in [`RatingRecord::extra`].
    pub extra_columns: Vec<String>,
    /// Rows in source order.
    pub records: Vec<RatingRecord>,
}

impl RatingsTable {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the rows matching `predicate`.
    #[must_use]
    pub fn retain(mut self, predicate: impl FnMut(&RatingRecord) -> bool) -> Self {
        self.records.retain(predicate);
        self
    }
}

/// One row of the stock registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Registered company name.
    pub name: String,
    /// Exchange ticker, possibly carrying a `^` annotation.
    pub symbol: Symbol,
}

/// A single value in a ratio record.
///
/// The ratios endpoint is unvalidated; most fields are numbers, a few are
/// strings (`period`, `calendarYear`) and any of them may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RatioValue {
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Missing value.
    Null,
}

impl RatioValue {
    /// The numeric value, if any.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Null => Ok(()),
        }
    }
}

/// Historical financial ratios reported for one symbol at one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatioRecord {
    /// Ticker the record was reported for.
    pub symbol: Symbol,
    /// Report date.
    pub date: NaiveDate,
    /// Every other field of the record, in the order the provider sent them.
    pub fields: Vec<(String, RatioValue)>,
}

impl FinancialRatioRecord {
    /// Fiscal year of the report.
    #[must_use]
    pub fn fiscal_year(&self) -> i32 {
        self.date.year()
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RatioValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// A rating joined to a registry entry through its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRating {
    /// The filtered rating row.
    pub rating: RatingRecord,
    /// Canonical key shared by the rating and the registry entry.
    pub canonical: CanonicalName,
    /// Registry ticker.
    pub symbol: Symbol,
}

/// A final dataset row: a matched rating plus the ratios of its effective
/// fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedObservation {
    /// The matched rating.
    pub matched: MatchedRating,
    /// Parsed rating date.
    pub rating_date: NaiveDate,
    /// Effective fiscal year shared by the rating and the ratios.
    pub year: i32,
    /// The ratio record for that year.
    pub ratios: FinancialRatioRecord,
}
