//! Ratings filtering and grade collapse.
//!
//! Rows that fail a predicate are dropped without being reported as errors.
//! The steps run in a fixed order: grade allow-list, exact duplicate removal,
//! agency filter, notch collapse.

use ratingset_types::RatingsTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Letter grades kept in the dataset, notches included.
pub const RATING_GRADES: [&str; 20] = [
    "A", "A+", "A-", "AA", "AA-", "AAA", "B", "B+", "B-", "BB", "BB+", "BB-", "BBB", "BBB+",
    "BBB-", "CC", "CCC", "CCC+", "CCC-", "D",
];

/// The only agency whose ratings are kept.
pub const RATING_AGENCY: &str = "Standard & Poor's Ratings Services";

/// Row counts after each filter step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Rows read.
    pub input: usize,
    /// Rows with an allow-listed grade.
    pub known_grade: usize,
    /// Rows left after exact duplicates were removed.
    pub distinct: usize,
    /// Rows issued by [`RATING_AGENCY`].
    pub agency: usize,
}

/// Keep rows whose grade is in [`RATING_GRADES`].
#[must_use]
pub fn keep_known_grades(table: RatingsTable) -> RatingsTable {
    table.retain(|r| RATING_GRADES.contains(&r.rating.as_str()))
}

/// Drop rows equal in every column to an earlier row.
#[must_use]
pub fn drop_exact_duplicates(table: RatingsTable) -> RatingsTable {
    let mut seen = HashSet::with_capacity(table.len());
    table.retain(|r| seen.insert(r.clone()))
}

/// Keep rows issued by [`RATING_AGENCY`].
#[must_use]
pub fn keep_agency(table: RatingsTable) -> RatingsTable {
    table.retain(|r| r.agency == RATING_AGENCY)
}

/// Strip `+` and `-` notches from a grade.
#[must_use]
pub fn collapse_grade(grade: &str) -> String {
    grade.replace(|c: char| c == '+' || c == '-', "")
}

/// Collapse the grade of every row.
#[must_use]
pub fn collapse_grades(mut table: RatingsTable) -> RatingsTable {
    for record in &mut table.records {
        record.rating = collapse_grade(&record.rating);
    }
    table
}

/// Run every filter step in order.
#[must_use]
pub fn filter_ratings(table: RatingsTable) -> (RatingsTable, FilterReport) {
    let input = table.len();
    let table = keep_known_grades(table);
    let known_grade = table.len();
    let table = drop_exact_duplicates(table);
    let distinct = table.len();
    let table = keep_agency(table);
    let agency = table.len();
    let table = collapse_grades(table);

    let report = FilterReport {
        input,
        known_grade,
        distinct,
        agency,
    };
    tracing::debug!(?report, "filtered ratings");

    (table, report)
}
