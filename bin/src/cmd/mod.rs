//! CLI subcommand modules.
//!
//! This module contains the implementations for all ratingset CLI subcommands.

pub(crate) mod build;
pub(crate) mod clean;
pub(crate) mod preview;
pub(crate) mod report;
