//! Error types for the ratingset pipeline.
//!
//! Filter predicates never produce errors; rows that fail them are dropped.
//! The variants here cover the fatal cases (unreadable inputs, missing
//! columns, bad rating dates) and per-symbol fetch failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ratingset operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// An input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// A required column is missing from an input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A date could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Fetching financial ratios for a symbol failed.
    #[error("Data fetch error for {symbol}: {reason}")]
    DataFetch {
        /// The ticker symbol being fetched.
        symbol: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Build a [`DatasetError::DataFetch`] for `symbol`.
    pub fn fetch(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataFetch {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for ratingset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
