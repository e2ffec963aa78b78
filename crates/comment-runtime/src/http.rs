//! Shared HTTP plumbing for the YouTube and chat clients.

use std::time::Duration;

use comment_core::error::{CommentError, Result};
use serde::Deserialize;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("yt-comments/", env!("CARGO_PKG_VERSION"));

/// Build a client with the given per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(network_error)
}

/// Map a transport-level failure.
pub fn network_error(e: reqwest::Error) -> CommentError {
    if e.is_timeout() {
        CommentError::Network(format!("request timed out: {}", e))
    } else {
        CommentError::Network(e.to_string())
    }
}

/// Return the body of a 2xx response, or an [`CommentError::Api`] carrying
/// the status and the service's error message.
pub async fn read_success(service: &str, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;

    if status.is_success() {
        return Ok(body);
    }

    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });
    Err(CommentError::Api {
        service: service.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Pull `error.message` out of a Google- or OpenAI-style error envelope.
pub fn extract_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Envelope {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorBody {
        Detailed { message: String },
        Plain(String),
    }

    let envelope: Envelope = serde_json::from_str(body).ok()?;
    let message = match envelope.error {
        ErrorBody::Detailed { message } => message,
        ErrorBody::Plain(message) => message,
    };
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Join a base URL and a path without doubling the slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
