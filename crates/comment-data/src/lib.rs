//! File handling and analysis for the comment pipeline.
//!
//! Discovers and loads stage inputs, writes stage outputs (JSON, CSV, text),
//! aggregates processed comments and renders the analysis report.

pub mod aggregator;
pub mod reader;
pub mod report;
pub mod writer;

pub use comment_core as core;
