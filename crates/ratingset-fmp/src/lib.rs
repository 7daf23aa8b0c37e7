//! Financial Modeling Prep (FMP) ratios client for ratingset.
//!
//! This crate fetches the historical financial ratio history of a company
//! from the [Financial Modeling Prep](https://financialmodelingprep.com/) v3
//! `ratios` endpoint and converts it into
//! [`FinancialRatioRecord`](ratingset_types::FinancialRatioRecord) values.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ratingset_fmp::FmpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!     let history = client.ratios("AAPL").await?;
//!     println!("{} annual ratio records", history.len());
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod types;

pub use client::FmpClient;
pub use error::FmpError;
pub use types::RawRatios;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
