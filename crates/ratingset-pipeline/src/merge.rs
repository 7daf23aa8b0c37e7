//! Identity merge of ratings and the stock registry.
//!
//! An inner join on [`CanonicalName`]. Ratings keep their order; within one
//! rating, matches follow registry order. A key shared by several registry
//! entries fans out to one row per entry. Names that normalize to nothing
//! share the empty key and join each other; those rows are counted in
//! [`MergeReport::empty_key_rows`].

use crate::normalize::{index_stocks, key_ratings};
use ratingset_types::{CanonicalName, MatchedRating, RatingsTable, StockRecord, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A canonical key that matched more than one distinct registry ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousMatch {
    /// The shared key.
    pub key: CanonicalName,
    /// Distinct registry tickers behind the key, in registry order.
    pub symbols: Vec<Symbol>,
}

/// Diagnostics of one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Joined rows produced.
    pub matched_rows: usize,
    /// Ratings without a registry match.
    pub unmatched_ratings: usize,
    /// Matched keys that fan out to several tickers, in first-seen order.
    pub ambiguous: Vec<AmbiguousMatch>,
    /// Joined rows whose canonical key is empty.
    pub empty_key_rows: usize,
}

/// Output of the identity merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Header of the extra rating columns carried by every row.
    pub extra_columns: Vec<String>,
    /// Joined rows.
    pub rows: Vec<MatchedRating>,
    /// Diagnostics.
    pub report: MergeReport,
}

/// Inner-join ratings with the registry on canonical name.
#[must_use]
pub fn merge_identities(ratings: RatingsTable, stocks: &[StockRecord]) -> MergeOutcome {
    let index = index_stocks(stocks);
    let mut rows = Vec::with_capacity(ratings.len());
    let mut report = MergeReport::default();
    let mut reported: HashSet<CanonicalName> = HashSet::new();

    for (key, rating) in key_ratings(ratings.records) {
        let Some(positions) = index.get(&key) else {
            report.unmatched_ratings += 1;
            continue;
        };

        if !reported.contains(&key) {
            let mut symbols: Vec<Symbol> = Vec::new();
            for &i in positions {
                if !symbols.contains(&stocks[i].symbol) {
                    symbols.push(stocks[i].symbol.clone());
                }
            }
            if symbols.len() > 1 {
                tracing::warn!(key = %key, ?symbols, "canonical name matches several tickers");
                report.ambiguous.push(AmbiguousMatch {
                    key: key.clone(),
                    symbols,
                });
            }
            reported.insert(key.clone());
        }

        if key.is_empty() {
            report.empty_key_rows += positions.len();
        }

        for &i in positions {
            rows.push(MatchedRating {
                rating: rating.clone(),
                canonical: key.clone(),
                symbol: stocks[i].symbol.clone(),
            });
        }
    }

    report.matched_rows = rows.len();
    if report.empty_key_rows > 0 {
        tracing::warn!(
            rows = report.empty_key_rows,
            "ratings joined on an empty canonical name"
        );
    }
    tracing::info!(
        matched = report.matched_rows,
        unmatched = report.unmatched_ratings,
        ambiguous = report.ambiguous.len(),
        "merged ratings with stock registry"
    );

    MergeOutcome {
        extra_columns: ratings.extra_columns,
        rows,
        report,
    }
}

/// Number of rows per (collapsed) grade, ordered by grade.
#[must_use]
pub fn grade_distribution(rows: &[MatchedRating]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.rating.rating.clone()).or_insert(0) += 1;
    }
    counts
}
