//! Build command implementation.

use crate::cmd::report::{
    grade_table, print_filter_report, print_header, print_merge_report, print_section,
};
use anyhow::{Context, Result};
use ratingset_fmp::FmpClient;
use ratingset_pipeline::{Pipeline, PipelineConfig, PipelineSummary};

/// Run the full pipeline against Financial Modeling Prep and print a summary.
pub(crate) async fn build_dataset(config: PipelineConfig, api_key: Option<String>) -> Result<()> {
    print_header("Rating Dataset Build");

    println!("Ratings: {}", config.ratings_path.display());
    println!("Stocks:  {}", config.stocks_path.display());
    println!("Output:  {}", config.output_path.display());
    println!("Fetch:   {:?}", config.fetch_policy);
    println!();

    let client = api_key
        .map_or_else(FmpClient::from_env, |key| Ok(FmpClient::new(key)))
        .context("no Financial Modeling Prep API key (set FMP_API_KEY or pass --api-key)")?;

    let summary = Pipeline::new(config, client)
        .run()
        .await
        .context("dataset build failed")?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &PipelineSummary) {
    print_section("RATINGS");
    print_filter_report(&summary.filter);

    print_section("IDENTITY MERGE");
    print_merge_report(&summary.merge);
    print!("{}", grade_table(&summary.grades));
    println!();

    print_section("FINANCIAL RATIOS");
    println!("Symbols requested:       {:>8}", summary.symbols_requested);
    println!("Symbols skipped:         {:>8}", summary.fetch_failures.len());
    for failure in &summary.fetch_failures {
        println!("  {:<10} {}", failure.symbol, failure.reason);
    }
    println!("Ratio records:           {:>8}", summary.ratio_records);
    println!();

    print_section("OUTPUT");
    println!("Aligned rows:            {:>8}", summary.aligned_rows);
    println!("Rows written:            {:>8}", summary.output_rows);
    println!("File:                    {}", summary.output_path.display());
    println!();
}
