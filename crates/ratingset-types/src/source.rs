//! Providers of historical financial ratios.
//!
//! The fetch stage talks to a [`RatioSource`] rather than to a concrete HTTP
//! client, so the pipeline can be driven from recorded data in tests.

use crate::{FinancialRatioRecord, Result};
use std::future::Future;

/// A provider of per-symbol historical financial ratio records.
///
/// One call fetches the full history for one symbol. Implementations must not
/// retry; the caller decides what a failure means for the run.
///
/// # Example
///
/// ```no_run
/// use ratingset_types::{FinancialRatioRecord, RatioSource, Result};
///
/// struct Empty;
///
/// impl RatioSource for Empty {
///     async fn fetch_ratios(&self, _symbol: &str) -> Result<Vec<FinancialRatioRecord>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait RatioSource: Send + Sync {
    /// Fetch every ratio record available for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DatasetError::DataFetch`] when the request fails or
    /// the response cannot be interpreted.
    fn fetch_ratios(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Vec<FinancialRatioRecord>>> + Send;
}
