//! Canonical name keys for both sides of the identity merge.

use ratingset_types::{CanonicalName, RatingRecord, StockRecord};
use std::collections::HashMap;

/// Normalize a raw company name.
///
/// Thin wrapper over [`CanonicalName::new`]; the rule table lives in
/// [`ratingset_types::name::NAME_RULES`].
#[must_use]
pub fn clean(name: &str) -> CanonicalName {
    CanonicalName::new(name)
}

/// Pair every rating with its canonical key.
pub fn key_ratings(
    records: impl IntoIterator<Item = RatingRecord>,
) -> impl Iterator<Item = (CanonicalName, RatingRecord)> {
    records.into_iter().map(|r| (clean(&r.name), r))
}

/// Index the registry by canonical key.
///
/// Each key maps to the positions of its entries in `stocks`, in registry
/// order. The empty key is indexed like any other.
#[must_use]
pub fn index_stocks(stocks: &[StockRecord]) -> HashMap<CanonicalName, Vec<usize>> {
    let mut index: HashMap<CanonicalName, Vec<usize>> = HashMap::new();
    for (i, stock) in stocks.iter().enumerate() {
        index.entry(clean(&stock.name)).or_default().push(i);
    }
    index
}
