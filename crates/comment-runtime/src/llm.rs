//! Chat-completions client and the two per-comment enrichment calls.

use std::time::Duration;

use async_trait::async_trait;
use comment_core::error::{CommentError, Result};
use comment_core::models::Sentiment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::{build_client, endpoint, network_error, read_success};

const SERVICE: &str = "OpenAI";

// ── Prompts ───────────────────────────────────────────────────────────────────

pub const TRANSLATE_SYSTEM_PROMPT: &str = "You are a helpful assistant that translates text to English (if not already in English) and cleans it by removing noise, formatting issues, and redundant information. Keep the core message intact.";

pub const CLASSIFY_SYSTEM_PROMPT: &str = "Classify the following comment into one of these categories: 'negative affirmation', 'positive affirmation', 'neutral affirmation', 'question'. Return ONLY the category name.";

fn translate_user_prompt(text: &str) -> String {
    format!("Clean and translate if necessary: {}", text)
}

// ── ChatClient ────────────────────────────────────────────────────────────────

/// A single-turn chat model.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a system and a user message; return the assistant's reply.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

// ── OpenAiClient ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the `/chat/completions` request for one system/user exchange.
    pub fn chat_request(&self, system: &str, user: &str) -> reqwest::Result<reqwest::Request> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        self.client
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .build()
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = self.chat_request(system, user).map_err(network_error)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(network_error)?;
        let body = read_success(SERVICE, response).await?;
        parse_chat_response(&body)
    }
}

/// First choice's message content, trimmed.
pub fn parse_chat_response(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        CommentError::MalformedResponse(format!("{} chat response: {}", SERVICE, e))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default().trim().to_string())
        .ok_or_else(|| {
            CommentError::MalformedResponse(format!("{} chat response has no choices", SERVICE))
        })
}

// ── Enrichment ────────────────────────────────────────────────────────────────

/// Translate `text` to English if needed and strip noise.
///
/// Falls back to the original text when the call fails or the model replies
/// with nothing.
pub async fn translate_and_clean<C: ChatClient + ?Sized>(client: &C, text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    match client
        .complete(TRANSLATE_SYSTEM_PROMPT, &translate_user_prompt(text))
        .await
    {
        Ok(cleaned) if !cleaned.is_empty() => cleaned,
        Ok(_) => {
            warn!("Empty translation reply; keeping original text");
            text.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Error in translation/cleaning");
            text.to_string()
        }
    }
}

/// Classify `text` into one of the four sentiment categories.
///
/// Unrecognised replies and failed calls yield
/// [`Sentiment::NeutralAffirmation`].
pub async fn classify_sentiment<C: ChatClient + ?Sized>(client: &C, text: &str) -> Sentiment {
    if text.trim().is_empty() {
        return Sentiment::NeutralAffirmation;
    }

    match client.complete(CLASSIFY_SYSTEM_PROMPT, text).await {
        Ok(reply) => match Sentiment::parse_label(&reply) {
            Some(sentiment) => sentiment,
            None => {
                debug!(reply = %reply, "Unrecognised sentiment label");
                Sentiment::NeutralAffirmation
            }
        },
        Err(e) => {
            warn!(error = %e, "Error in sentiment classification");
            Sentiment::NeutralAffirmation
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
