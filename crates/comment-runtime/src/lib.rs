//! Network clients and stage orchestration for yt-comments.
//!
//! Talks to the YouTube Data API and an OpenAI-compatible chat endpoint
//! through the [`youtube::CommentSource`] and [`llm::ChatClient`] traits, and
//! runs the fetch, process and analyze stages over the on-disk layout from
//! `comment-data`.

pub mod fetcher;
pub mod http;
pub mod llm;
pub mod orchestrator;
pub mod processor;
pub mod youtube;

pub use comment_core as core;
pub use comment_data as data;
