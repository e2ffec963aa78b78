//! YouTube Data API v3 comment-thread client.
//!
//! [`CommentSource`] is the seam the fetch stage talks to; [`YouTubeClient`]
//! is the HTTPS implementation and [`fetch_video_comments`] drives
//! pagination over any source.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use comment_core::error::{CommentError, Result};
use comment_core::models::Comment;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::http::{build_client, endpoint, network_error, read_success};

/// Largest page the `commentThreads` endpoint will return.
pub const MAX_PAGE_SIZE: usize = 100;

const SERVICE: &str = "YouTube";

// ── Video ids ─────────────────────────────────────────────────────────────────

fn bare_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("regex is valid"))
}

fn url_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:v=|youtu\.be/|/shorts/|/embed/|/live/|/v/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)",
        )
        .expect("regex is valid")
    })
}

/// Any path segment of exactly 11 id characters.
fn path_segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").expect("regex is valid")
    })
}

/// Extract the 11-character video id from a URL or a bare id.
///
/// Known URL shapes are tried first, then any 11-character path segment.
///
/// ```
/// use comment_runtime::youtube::extract_video_id;
///
/// assert_eq!(
///     extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap(),
///     "dQw4w9WgXcQ"
/// );
/// assert!(extract_video_id("https://example.com/").is_err());
/// ```
pub fn extract_video_id(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if bare_id_re().is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    url_id_re()
        .captures(trimmed)
        .or_else(|| path_segment_re().captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CommentError::InvalidVideoUrl(input.to_string()))
}

// ── CommentSource ─────────────────────────────────────────────────────────────

/// One page of top-level comments.
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub next_page_token: Option<String>,
}

/// Anything that can serve pages of top-level comments for a video.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<CommentPage>;
}

/// Collect up to `max_results` comments for `video_id`, following page
/// tokens.
///
/// Each request asks for at most [`MAX_PAGE_SIZE`] comments. Pagination stops
/// when the source returns no next-page token, returns an empty page, or the
/// cap is reached.
pub async fn fetch_video_comments<S: CommentSource + ?Sized>(
    source: &S,
    video_id: &str,
    max_results: usize,
) -> Result<Vec<Comment>> {
    let mut comments: Vec<Comment> = Vec::new();
    let mut page_token: Option<String> = None;

    while comments.len() < max_results {
        let page_size = (max_results - comments.len()).min(MAX_PAGE_SIZE);
        let page = source
            .fetch_page(video_id, page_token.as_deref(), page_size as u32)
            .await?;

        let received = page.comments.len();
        comments.extend(page.comments);
        debug!(
            video_id,
            received,
            total = comments.len(),
            "fetched comment page"
        );

        match page.next_page_token {
            Some(token) if !token.is_empty() && received > 0 => page_token = Some(token),
            _ => break,
        }
    }

    comments.truncate(max_results);
    Ok(comments)
}

// ── YouTubeClient ─────────────────────────────────────────────────────────────

/// HTTPS client for `commentThreads.list`.
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build the `commentThreads.list` request for one page.
    ///
    /// `pageToken` is only sent after the first page.
    pub fn page_request(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> reqwest::Result<reqwest::Request> {
        let mut query: Vec<(&str, String)> = vec![
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", page_size.to_string()),
            ("textFormat", "plainText".to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        self.client
            .get(endpoint(&self.base_url, "commentThreads"))
            .query(&query)
            .build()
    }
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<CommentPage> {
        let request = self
            .page_request(video_id, page_token, page_size)
            .map_err(network_error)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(network_error)?;
        let body = read_success(SERVICE, response).await?;
        parse_comment_threads(video_id, &body)
    }
}

// ── Response parsing ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadListResponse {
    #[serde(default)]
    items: Vec<ThreadItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadItem {
    #[serde(default)]
    id: String,
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
    #[serde(default)]
    total_reply_count: u64,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    #[serde(default)]
    id: String,
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    like_count: u64,
    published_at: DateTime<Utc>,
}

/// Turn a `commentThreads.list` response body into a [`CommentPage`].
pub fn parse_comment_threads(video_id: &str, body: &str) -> Result<CommentPage> {
    let response: ThreadListResponse = serde_json::from_str(body).map_err(|e| {
        CommentError::MalformedResponse(format!("{} commentThreads response: {}", SERVICE, e))
    })?;

    let comments = response
        .items
        .into_iter()
        .map(|item| {
            let top = item.snippet.top_level_comment;
            let comment_id = if top.id.is_empty() { item.id } else { top.id };
            Comment {
                video_id: video_id.to_string(),
                comment_id,
                author: top.snippet.author_display_name,
                text: top.snippet.text_display,
                likes: top.snippet.like_count,
                published_at: top.snippet.published_at,
                reply_count: item.snippet.total_reply_count,
            }
        })
        .collect();

    Ok(CommentPage {
        comments,
        next_page_token: response.next_page_token,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
