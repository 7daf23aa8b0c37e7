//! Pipeline configuration.

use ratingset_types::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default ratings history input.
pub const DEFAULT_RATINGS_PATH: &str = "data/ratings-history.csv";

/// Default stock registry input.
pub const DEFAULT_STOCKS_PATH: &str = "data/us_stocks.csv";

/// Default dataset output.
pub const DEFAULT_OUTPUT_PATH: &str = "data/rating_dataframe.csv";

/// What to do when fetching ratios for one symbol fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchPolicy {
    /// Log the failure and continue with the next symbol.
    #[default]
    Skip,
    /// Stop the run with the first failure.
    Abort,
}

/// Configuration for a dataset build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Ratings history CSV.
    pub ratings_path: PathBuf,

    /// Stock registry CSV.
    pub stocks_path: PathBuf,

    /// Where the joined dataset is written. Overwritten on every run.
    pub output_path: PathBuf,

    /// Failure handling for per-symbol ratio fetches (default: skip).
    pub fetch_policy: FetchPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ratings_path: PathBuf::from(DEFAULT_RATINGS_PATH),
            stocks_path: PathBuf::from(DEFAULT_STOCKS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            fetch_policy: FetchPolicy::Skip,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations that would overwrite an input.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Config`] if the output path equals an input
    /// path.
    pub fn validate(&self) -> Result<()> {
        if self.output_path == self.ratings_path || self.output_path == self.stocks_path {
            return Err(DatasetError::Config(format!(
                "output path {} would overwrite an input file",
                self.output_path.display()
            )));
        }
        Ok(())
    }
}
