//! End-to-end dataset build.

use crate::{
    align::align,
    config::PipelineConfig,
    export::{dedup_observations, to_dataframe, write_csv},
    fetch::{FetchFailure, fetch_all, fetch_targets},
    filter::{FilterReport, filter_ratings},
    ingest::{load_ratings, load_stocks},
    merge::{MergeOutcome, MergeReport, grade_distribution, merge_identities},
};
use polars::prelude::DataFrame;
use ratingset_types::{FinancialRatioRecord, RatioSource, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output of the offline stages: load, filter, normalize, merge.
#[derive(Debug, Clone, Default)]
pub struct Prepared {
    /// Filter step counts.
    pub filter: FilterReport,
    /// Merged rows and merge diagnostics.
    pub merge: MergeOutcome,
}

impl Prepared {
    /// Matched rows per collapsed grade.
    #[must_use]
    pub fn grade_distribution(&self) -> BTreeMap<String, usize> {
        grade_distribution(&self.merge.rows)
    }
}

/// Counts collected during a full run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Filter step counts.
    pub filter: FilterReport,
    /// Merge diagnostics.
    pub merge: MergeReport,
    /// Matched rows per collapsed grade.
    pub grades: BTreeMap<String, usize>,
    /// Symbols requested from the ratio source.
    pub symbols_requested: usize,
    /// Symbols skipped after a failed fetch.
    pub fetch_failures: Vec<FetchFailure>,
    /// Ratio records received.
    pub ratio_records: usize,
    /// Rows after the fiscal-year join.
    pub aligned_rows: usize,
    /// Rows written.
    pub output_rows: usize,
    /// Output file.
    pub output_path: PathBuf,
}

/// Load both inputs, filter the ratings and merge them with the registry.
///
/// Makes no network calls.
///
/// # Errors
///
/// Returns an error if an input is missing, unreadable or lacks a required
/// column.
pub fn prepare(config: &PipelineConfig) -> Result<Prepared> {
    let ratings = load_ratings(&config.ratings_path)?;
    let stocks = load_stocks(&config.stocks_path)?;
    tracing::info!(ratings = ratings.len(), stocks = stocks.len(), "loaded inputs");

    let (ratings, filter) = filter_ratings(ratings);
    let merge = merge_identities(ratings, &stocks);

    Ok(Prepared { filter, merge })
}

/// Align, deduplicate and lay out the final dataset.
///
/// # Errors
///
/// Returns [`ratingset_types::DatasetError::InvalidDate`] for an unparseable
/// rating date, or a Polars error if the frame cannot be built.
pub fn build_dataset(
    merge: MergeOutcome,
    ratios: &[FinancialRatioRecord],
) -> Result<(DataFrame, usize)> {
    let aligned = align(merge.rows, ratios)?;
    let aligned_rows = aligned.len();
    let rows = dedup_observations(aligned);
    let df = to_dataframe(&merge.extra_columns, &rows)?;
    Ok((df, aligned_rows))
}

/// A configured dataset build.
#[derive(Debug)]
pub struct Pipeline<S> {
    config: PipelineConfig,
    source: S,
}

impl<S: RatioSource> Pipeline<S> {
    /// Create a pipeline reading ratios from `source`.
    #[must_use]
    pub const fn new(config: PipelineConfig, source: S) -> Self {
        Self { config, source }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage and write the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration, unreadable inputs, an
    /// unparseable rating date, a failed write, or (with
    /// [`crate::FetchPolicy::Abort`]) the first failed fetch.
    pub async fn run(&self) -> Result<PipelineSummary> {
        self.config.validate()?;

        let prepared = prepare(&self.config)?;
        let grades = prepared.grade_distribution();
        let Prepared { filter, merge } = prepared;

        let symbols = fetch_targets(&merge.rows);
        let fetched = fetch_all(&self.source, &symbols, self.config.fetch_policy).await?;

        let merge_report = merge.report.clone();
        let (mut df, aligned_rows) = build_dataset(merge, &fetched.records)?;
        write_csv(&mut df, &self.config.output_path)?;

        Ok(PipelineSummary {
            filter,
            merge: merge_report,
            grades,
            symbols_requested: fetched.requested,
            fetch_failures: fetched.failures,
            ratio_records: fetched.records.len(),
            aligned_rows,
            output_rows: df.height(),
            output_path: self.config.output_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchPolicy;
    use crate::ingest::read_table;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ratingset_types::{DatasetError, RatioValue};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const RATINGS: &str = "\
Name,Rating Agency Name,Rating,date
Acme Corp.,Standard & Poor's Ratings Services,AA-,2020-05-01
Acme Corp.,Standard & Poor's Ratings Services,AA-,2020-05-01
ACME CORP,Standard & Poor's Ratings Services,AA,2020-05-01
Acme Corp.,Moody's Investors Service,AA-,2020-05-01
Beta Plc,Standard & Poor's Ratings Services,NR,2020-01-15
Gamma Ltd,Standard & Poor's Ratings Services,BBB+,2019-08-15
Delta Holdings,Standard & Poor's Ratings Services,B-,2018-09-01
";

    const STOCKS: &str = "\
Symbol,Name
ACME,Acme Corporation
GAM.B,Gamma Limited
";

    /// Serves ACME's two annual reports and fails for anything else.
    struct Recorded;

    impl RatioSource for Recorded {
        async fn fetch_ratios(&self, symbol: &str) -> Result<Vec<FinancialRatioRecord>> {
            if symbol != "ACME" {
                return Err(DatasetError::fetch(symbol, "unknown symbol"));
            }
            let report = |year: i32, current: f64| FinancialRatioRecord {
                symbol: "ACME".to_string(),
                date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                fields: vec![
                    ("currentRatio".to_string(), RatioValue::Number(current)),
                    ("period".to_string(), RatioValue::Text("FY".to_string())),
                ],
            };
            Ok(vec![report(2020, 9.9), report(2019, 1.5)])
        }
    }

    fn config_in(dir: &Path, ratings: &str, stocks: &str) -> PipelineConfig {
        let ratings_path = dir.join("ratings-history.csv");
        let stocks_path = dir.join("us_stocks.csv");
        fs::write(&ratings_path, ratings).unwrap();
        fs::write(&stocks_path, stocks).unwrap();
        PipelineConfig {
            ratings_path,
            stocks_path,
            output_path: dir.join("out").join("rating_dataframe.csv"),
            fetch_policy: FetchPolicy::Skip,
        }
    }

    #[test]
    fn test_prepare_filters_and_merges() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), RATINGS, STOCKS);

        let prepared = prepare(&config).unwrap();

        assert_eq!(
            prepared.filter,
            FilterReport {
                input: 7,
                known_grade: 6,
                distinct: 5,
                agency: 4,
            }
        );
        assert_eq!(prepared.merge.report.matched_rows, 3);
        assert_eq!(prepared.merge.report.unmatched_ratings, 1);

        let symbols: Vec<&str> = prepared
            .merge
            .rows
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(symbols, ["ACME", "ACME", "GAM.B"]);

        let grades = prepared.grade_distribution();
        assert_eq!(grades.get("AA"), Some(&2));
        assert_eq!(grades.get("BBB"), Some(&1));
    }

    #[tokio::test]
    async fn test_run_writes_aligned_dataset() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), RATINGS, STOCKS);
        let output = config.output_path.clone();

        let summary = Pipeline::new(config, Recorded).run().await.unwrap();

        // GAM.B is not fetchable, so only ACME is requested.
        assert_eq!(summary.symbols_requested, 1);
        assert!(summary.fetch_failures.is_empty());
        assert_eq!(summary.ratio_records, 2);
        // Both ACME rows reach fiscal year 2019; they share date and key.
        assert_eq!(summary.aligned_rows, 2);
        assert_eq!(summary.output_rows, 1);
        assert_eq!(summary.output_path, output);

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written.lines().next().unwrap(),
            "Name,Rating Agency Name,Rating,date,Clean_Name,Symbol,Year,date_ratio,currentRatio,period"
        );

        let df = read_table(&output).unwrap();
        assert_eq!(df.height(), 1);
        let cell = |name: &str| {
            df.column(name)
                .unwrap()
                .as_materialized_series()
                .str()
                .unwrap()
                .get(0)
                .unwrap()
                .to_string()
        };
        assert_eq!(cell("Name"), "Acme Corp.");
        assert_eq!(cell("Rating"), "AA");
        assert_eq!(cell("date"), "2020-05-01");
        assert_eq!(cell("Clean_Name"), "acme");
        assert_eq!(cell("Symbol"), "ACME");
        assert_eq!(cell("Year"), "2019");
        assert_eq!(cell("date_ratio"), "2019-12-31");
        assert_eq!(cell("period"), "FY");
        assert_relative_eq!(cell("currentRatio").parse::<f64>().unwrap(), 1.5);
    }

    #[tokio::test]
    async fn test_run_skips_failed_symbols() {
        let dir = TempDir::new().unwrap();
        let stocks = "Symbol,Name\nACME,Acme Corporation\nGAMMA,Gamma Limited\n";
        let config = config_in(dir.path(), RATINGS, stocks);

        let summary = Pipeline::new(config, Recorded).run().await.unwrap();

        assert_eq!(summary.symbols_requested, 2);
        assert_eq!(summary.fetch_failures.len(), 1);
        assert_eq!(summary.fetch_failures[0].symbol, "GAMMA");
        assert_eq!(summary.output_rows, 1);
    }

    #[tokio::test]
    async fn test_run_abort_on_failed_symbol() {
        let dir = TempDir::new().unwrap();
        let stocks = "Symbol,Name\nACME,Acme Corporation\nGAMMA,Gamma Limited\n";
        let mut config = config_in(dir.path(), RATINGS, stocks);
        config.fetch_policy = FetchPolicy::Abort;
        let output = config.output_path.clone();

        let err = Pipeline::new(config, Recorded).run().await.unwrap_err();

        assert!(matches!(err, DatasetError::DataFetch { ref symbol, .. } if symbol == "GAMMA"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_run_rejects_output_over_input() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path(), RATINGS, STOCKS);
        config.output_path = config.ratings_path.clone();

        let err = Pipeline::new(config, Recorded).run().await.unwrap_err();

        assert!(matches!(err, DatasetError::Config(_)));
        assert_eq!(
            fs::read_to_string(dir.path().join("ratings-history.csv")).unwrap(),
            RATINGS
        );
    }

    #[test]
    fn test_build_dataset_without_ratios_is_header_only() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), RATINGS, STOCKS);
        let prepared = prepare(&config).unwrap();

        let (df, aligned_rows) = build_dataset(prepared.merge, &[]).unwrap();

        assert_eq!(aligned_rows, 0);
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 8);
    }
}
