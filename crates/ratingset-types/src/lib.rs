#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratingset/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the ratingset credit rating dataset builder.
//!
//! This crate holds the records that flow between pipeline stages, the
//! [`CanonicalName`] join key, the [`RatioSource`] seam for financial ratio
//! providers and the shared [`DatasetError`].

/// The version of the ratingset-types crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod name;
pub mod source;
pub mod types;

pub use error::{DatasetError, Result};
pub use name::CanonicalName;
pub use source::RatioSource;
pub use types::{
    FinancialRatioRecord, JoinedObservation, MatchedRating, RatingRecord, RatingsTable,
    RatioValue, StockRecord, Symbol,
};
