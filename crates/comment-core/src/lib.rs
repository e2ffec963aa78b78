//! Shared types for the YouTube comment pipeline.
//!
//! Holds the comment data model, the error type, the theme keyword table,
//! text formatting helpers used by the report, and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod themes;

pub use error::{CommentError, Result};
pub use models::{Comment, ProcessedBatch, ProcessedComment, Sentiment, SentimentCounts};
