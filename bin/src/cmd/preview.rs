//! Preview command implementation.

use crate::cmd::report::{
    grade_table, print_filter_report, print_header, print_merge_report, print_section,
};
use anyhow::{Context, Result};
use ratingset_pipeline::fetch::fetch_targets;
use ratingset_pipeline::{PipelineConfig, prepare};

/// Filter and merge the inputs and print what a build would fetch.
pub(crate) fn preview_inputs(config: &PipelineConfig) -> Result<()> {
    print_header("Rating Dataset Preview");

    let prepared = prepare(config).context("failed to prepare inputs")?;
    let symbols = fetch_targets(&prepared.merge.rows);

    print_section("RATINGS");
    print_filter_report(&prepared.filter);

    print_section("IDENTITY MERGE");
    print_merge_report(&prepared.merge.report);
    print!("{}", grade_table(&prepared.grade_distribution()));
    println!();

    println!("Symbols to fetch:        {:>8}", symbols.len());
    println!();

    Ok(())
}
