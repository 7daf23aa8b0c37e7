//! Financial ratio fetching.
//!
//! Symbols are fetched one at a time. Each symbol yields either its ratio
//! history or nothing; the histories are concatenated at the end.

use crate::config::FetchPolicy;
use ratingset_types::{FinancialRatioRecord, MatchedRating, RatioSource, Result, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Strip a `^...` annotation from a ticker.
///
/// A caret with nothing after it is left alone, so `"ABC^"` stays as is and
/// is later rejected by [`is_fetchable`].
#[must_use]
pub fn strip_annotation(symbol: &str) -> &str {
    match symbol.find('^') {
        Some(i) if i + 1 < symbol.len() => &symbol[..i],
        _ => symbol,
    }
}

/// Whether a symbol can be requested: non-empty and alphabetic only.
///
/// Class-share tickers such as `"BRK.B"` or numbered series are excluded.
#[must_use]
pub fn is_fetchable(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.chars().all(char::is_alphabetic)
}

/// Symbols to fetch for the merged rows.
///
/// Annotations are stripped, non-alphabetic symbols dropped and duplicates
/// removed, keeping first-seen order.
#[must_use]
pub fn fetch_targets(rows: &[MatchedRating]) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|r| strip_annotation(&r.symbol))
        .filter(|s| seen.insert(*s))
        .filter(|s| {
            let ok = is_fetchable(s);
            if !ok {
                tracing::debug!(symbol = *s, "skipping non-alphabetic symbol");
            }
            ok
        })
        .map(str::to_string)
        .collect()
}

/// A symbol whose fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// The symbol.
    pub symbol: Symbol,
    /// Error message.
    pub reason: String,
}

/// Result of fetching every target symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// Every record returned, grouped by symbol in request order.
    pub records: Vec<FinancialRatioRecord>,
    /// Symbols requested.
    pub requested: usize,
    /// Symbols whose fetch failed and were skipped.
    pub failures: Vec<FetchFailure>,
}

/// Fetch the ratio history of every symbol, one request at a time.
///
/// # Errors
///
/// With [`FetchPolicy::Abort`], returns the first fetch error. With
/// [`FetchPolicy::Skip`] this never fails; failures are logged and listed in
/// [`FetchOutcome::failures`].
pub async fn fetch_all<S: RatioSource>(
    source: &S,
    symbols: &[Symbol],
    policy: FetchPolicy,
) -> Result<FetchOutcome> {
    let mut histories: Vec<Vec<FinancialRatioRecord>> = Vec::with_capacity(symbols.len());
    let mut failures = Vec::new();

    for symbol in symbols {
        match source.fetch_ratios(symbol).await {
            Ok(records) => {
                tracing::debug!(symbol = %symbol, records = records.len(), "fetched ratios");
                histories.push(records);
            }
            Err(e) => match policy {
                FetchPolicy::Abort => return Err(e),
                FetchPolicy::Skip => {
                    tracing::warn!(symbol = %symbol, error = %e, "skipping symbol");
                    failures.push(FetchFailure {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    let records: Vec<FinancialRatioRecord> = histories.into_iter().flatten().collect();
    tracing::info!(
        symbols = symbols.len(),
        failed = failures.len(),
        records = records.len(),
        "fetched financial ratios"
    );

    Ok(FetchOutcome {
        records,
        requested: symbols.len(),
        failures,
    })
}
