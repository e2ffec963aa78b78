//! Stage 2: translate, clean and classify raw comments.

use std::path::{Path, PathBuf};

use comment_core::error::Result;
use comment_core::models::{Comment, ProcessedBatch, ProcessedComment};
use comment_data::aggregator::{CommentAggregator, SentimentDistribution};
use comment_data::reader::load_comments;
use comment_data::writer::{current_stamp, write_json, OutputLayout};
use tracing::{debug, info};

use crate::llm::{classify_sentiment, translate_and_clean, ChatClient};

/// Log progress every this many comments.
const PROGRESS_EVERY: usize = 50;

/// What a process run produced.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub processed: usize,
    pub distribution: SentimentDistribution,
}

pub struct Processor<'a, C: ChatClient + ?Sized> {
    chat: &'a C,
    layout: &'a OutputLayout,
    max_comments: usize,
}

impl<'a, C: ChatClient + ?Sized> Processor<'a, C> {
    pub fn new(chat: &'a C, layout: &'a OutputLayout, max_comments: usize) -> Self {
        Self {
            chat,
            layout,
            max_comments,
        }
    }

    /// Enrich the first `max_comments` comments.
    ///
    /// Every comment is translated first, then every cleaned text is
    /// classified. Output order matches input order.
    pub async fn enrich(&self, mut comments: Vec<Comment>) -> Vec<ProcessedComment> {
        comments.truncate(self.max_comments);
        let total = comments.len();

        info!("Translating and cleaning {} comments", total);
        let mut cleaned = Vec::with_capacity(total);
        for (i, comment) in comments.iter().enumerate() {
            cleaned.push(translate_and_clean(self.chat, &comment.text).await);
            log_progress("translated", i + 1, total);
        }

        info!("Classifying sentiments");
        let mut processed = Vec::with_capacity(total);
        for (i, (comment, cleaned_text)) in comments.into_iter().zip(cleaned).enumerate() {
            let sentiment = classify_sentiment(self.chat, &cleaned_text).await;
            processed.push(ProcessedComment {
                comment,
                cleaned_text,
                sentiment,
            });
            log_progress("classified", i + 1, total);
        }

        processed
    }

    /// Load raw comments from `input`, enrich them and write the batch.
    pub async fn run(&self, input: &Path) -> Result<ProcessOutcome> {
        info!("Loading comments from {}", input.display());
        let comments = load_comments(input)?;
        if comments.len() > self.max_comments {
            info!(
                "Limiting processing to the first {} of {} comments",
                self.max_comments,
                comments.len()
            );
        }

        let processed = self.enrich(comments).await;
        let distribution = CommentAggregator::sentiment_distribution(&processed);

        let output_path = self.layout.processed_path(&current_stamp());
        let batch = ProcessedBatch {
            comments: processed,
        };
        write_json(&output_path, &batch)?;
        info!("Analysis results saved to {}", output_path.display());

        Ok(ProcessOutcome {
            input_path: input.to_path_buf(),
            output_path,
            processed: batch.comments.len(),
            distribution,
        })
    }
}

fn log_progress(action: &str, done: usize, total: usize) {
    if done % PROGRESS_EVERY == 0 || done == total {
        info!("{} {}/{} comments", action, done, total);
    } else {
        debug!("{} {}/{} comments", action, done, total);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use comment_core::error::CommentError;
    use comment_core::models::Sentiment;
    use comment_data::reader::load_processed;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    use crate::llm::CLASSIFY_SYSTEM_PROMPT;

    /// Upper-cases on translate; labels by keyword on classify.
    struct FakeChat {
        calls: AtomicUsize,
    }

    impl FakeChat {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatClient for FakeChat {
        async fn complete(&self, system: &str, user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if system == CLASSIFY_SYSTEM_PROMPT {
                let label = if user.ends_with('?') {
                    "question"
                } else if user.contains("BAD") {
                    "negative affirmation"
                } else if user.contains("GREAT") {
                    "Positive Affirmation"
                } else {
                    return Err(CommentError::Network("connection reset".to_string()));
                };
                return Ok(label.to_string());
            }
            let text = user
                .strip_prefix("Clean and translate if necessary: ")
                .unwrap_or(user);
            Ok(text.to_uppercase())
        }
    }

    fn comment(n: u64, text: &str) -> Comment {
        Comment {
            video_id: "vid".to_string(),
            comment_id: format!("c{}", n),
            author: format!("user{}", n),
            text: text.to_string(),
            likes: n,
            published_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            reply_count: 0,
        }
    }

    fn raw() -> Vec<Comment> {
        vec![
            comment(1, "great app"),
            comment(2, "fees too high?"),
            comment(3, "bad support"),
            comment(4, "meh"),
        ]
    }

    #[tokio::test]
    async fn test_enrich_translates_then_classifies() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path());
        let chat = FakeChat::new();
        let processor = Processor::new(&chat, &layout, 1000);

        let processed = processor.enrich(raw()).await;

        assert_eq!(processed.len(), 4);
        assert_eq!(processed[0].cleaned_text, "GREAT APP");
        assert_eq!(processed[0].comment.text, "great app");
        assert_eq!(processed[0].sentiment, Sentiment::PositiveAffirmation);
        assert_eq!(processed[1].sentiment, Sentiment::Question);
        assert_eq!(processed[2].sentiment, Sentiment::NegativeAffirmation);
        // classification error falls back to neutral
        assert_eq!(processed[3].sentiment, Sentiment::NeutralAffirmation);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_enrich_respects_cap() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path());
        let chat = FakeChat::new();
        let processor = Processor::new(&chat, &layout, 2);

        let processed = processor.enrich(raw()).await;

        assert_eq!(processed.len(), 2);
        assert_eq!(processed[1].comment.comment_id, "c2");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_run_writes_processed_batch() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path());
        let input = layout.raw_dir().join("youtube_comments_20240115_100000.json");
        write_json(&input, &raw()).unwrap();

        let chat = FakeChat::new();
        let outcome = Processor::new(&chat, &layout, 1000)
            .run(&input)
            .await
            .unwrap();

        assert_eq!(outcome.processed, 4);
        assert!(outcome.output_path.starts_with(layout.processed_dir()));
        assert_eq!(outcome.distribution.counts.get(Sentiment::Question), 1);

        let body = std::fs::read_to_string(&outcome.output_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["comments"][1]["sentiment"], "question");
        assert_eq!(value["comments"][1]["cleaned_text"], "FEES TOO HIGH?");
        assert_eq!(value["comments"][1]["author"], "user2");

        let reloaded = load_processed(&outcome.output_path).unwrap();
        assert_eq!(reloaded.len(), 4);
    }

    #[tokio::test]
    async fn test_run_missing_input_errors() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path());
        let chat = FakeChat::new();
        let err = Processor::new(&chat, &layout, 10)
            .run(&tmp.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommentError::FileRead { .. }));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }
}
