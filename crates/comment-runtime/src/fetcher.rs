//! Stage 1: collect raw comments for a list of videos.

use std::collections::HashSet;
use std::path::PathBuf;

use comment_core::error::Result;
use comment_core::models::Comment;
use comment_data::writer::{current_stamp, write_comments_csv, write_json, OutputLayout};
use tracing::{debug, info, warn};

use crate::youtube::{extract_video_id, fetch_video_comments, CommentSource};

/// What a fetch run produced.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Videos whose comments were fetched.
    pub videos_fetched: usize,
    /// Inputs skipped because the id was invalid or the API call failed.
    pub videos_skipped: usize,
    pub comments: usize,
    /// `None` when nothing was collected.
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

impl FetchOutcome {
    pub fn has_output(&self) -> bool {
        self.json_path.is_some()
    }
}

pub struct Fetcher<'a, S: CommentSource + ?Sized> {
    source: &'a S,
    layout: &'a OutputLayout,
    max_per_video: usize,
}

impl<'a, S: CommentSource + ?Sized> Fetcher<'a, S> {
    pub fn new(source: &'a S, layout: &'a OutputLayout, max_per_video: usize) -> Self {
        Self {
            source,
            layout,
            max_per_video,
        }
    }

    /// Fetch every input and concatenate the results in input order.
    ///
    /// Invalid inputs and videos whose fetch fails are logged and skipped.
    /// The same video listed twice is fetched once.
    pub async fn collect(&self, inputs: &[String]) -> (Vec<Comment>, FetchOutcome) {
        let mut all = Vec::new();
        let mut outcome = FetchOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();

        for input in inputs {
            let video_id = match extract_video_id(input) {
                Ok(id) => id,
                Err(e) => {
                    warn!(input = %input, error = %e, "Skipping input");
                    outcome.videos_skipped += 1;
                    continue;
                }
            };

            if !seen.insert(video_id.clone()) {
                debug!(video_id = %video_id, "Duplicate video; already fetched");
                continue;
            }

            info!("Processing video ID: {}", video_id);
            match fetch_video_comments(self.source, &video_id, self.max_per_video).await {
                Ok(comments) => {
                    info!("Fetched {} comments for {}", comments.len(), video_id);
                    outcome.videos_fetched += 1;
                    all.extend(comments);
                }
                Err(e) => {
                    warn!(video_id = %video_id, error = %e, "Error fetching comments");
                    outcome.videos_skipped += 1;
                }
            }
        }

        outcome.comments = all.len();
        (all, outcome)
    }

    /// Collect comments and write them as JSON and CSV.
    pub async fn run(&self, inputs: &[String]) -> Result<FetchOutcome> {
        let (comments, mut outcome) = self.collect(inputs).await;

        if comments.is_empty() {
            warn!("No comments were fetched");
            return Ok(outcome);
        }

        let (json_path, csv_path) = self.layout.raw_paths(&current_stamp());
        write_json(&json_path, &comments)?;
        info!("Saved {} comments to {}", comments.len(), json_path.display());
        outcome.json_path = Some(json_path);

        if write_comments_csv(&csv_path, &comments)? {
            info!("Saved CSV to {}", csv_path.display());
            outcome.csv_path = Some(csv_path);
        }

        Ok(outcome)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
