#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratingset/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # ratingset-pipeline
//!
//! Builds a credit rating classification dataset: agency ratings joined with
//! the financial ratios of the fiscal year each rating reflects.
//!
//! ## Stages
//!
//! 1. [`filter`] - grade allow-list, exact duplicates, single agency, notch collapse
//! 2. [`normalize`] - canonical company names for both inputs
//! 3. [`merge`] - inner join of ratings and the stock registry on canonical name
//! 4. [`fetch`] - per-symbol ratio history from a [`RatioSource`]
//! 5. [`align`] - mid-year cutoff fiscal year and the (ticker, year) join
//! 6. [`export`] - dedup on (rating date, canonical name) and CSV output
//!
//! [`Pipeline`] runs them in order. [`prepare`] runs the offline stages only.
//!
//! ```ignore
//! use ratingset_pipeline::{Pipeline, PipelineConfig};
//! use ratingset_fmp::FmpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(PipelineConfig::default(), FmpClient::from_env()?);
//! let summary = pipeline.run().await?;
//! println!("wrote {} rows", summary.output_rows);
//! # Ok(())
//! # }
//! ```
//!
//! [`RatioSource`]: ratingset_types::RatioSource

pub mod align;
pub mod config;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod ingest;
pub mod merge;
pub mod normalize;
pub mod pipeline;

pub use config::{FetchPolicy, PipelineConfig};
pub use pipeline::{Pipeline, PipelineSummary, Prepared, build_dataset, prepare};
