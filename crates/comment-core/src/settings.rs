use clap::Parser;
use std::path::PathBuf;

use crate::error::{CommentError, Result};

/// Default YouTube Data API v3 root.
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default OpenAI-compatible API root.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the YouTube Data API key.
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Fetch, translate and analyse YouTube comments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "yt-comments",
    about = "Fetch, translate and analyse YouTube comments",
    version
)]
pub struct Settings {
    /// Pipeline stage to run
    #[arg(long, default_value = "all", value_parser = ["fetch", "process", "analyze", "all"])]
    pub stage: String,

    /// Video URLs or ids (overrides --urls-file)
    #[arg(value_name = "VIDEOS")]
    pub videos: Vec<String>,

    /// File with one video URL or id per line
    #[arg(long, default_value = "youtube_urls.txt")]
    pub urls_file: PathBuf,

    /// Root directory for stage outputs
    #[arg(long, default_value = "output_dir")]
    pub output_dir: PathBuf,

    /// Explicit input file for the process or analyze stage
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Maximum comments fetched per video
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_comments: u32,

    /// Maximum comments sent through translation and classification
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_process: u32,

    /// Number of most-liked comments listed in the report
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub top_n: u32,

    /// Chat model used for translation and classification
    #[arg(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// YouTube Data API key
    #[arg(long, env = YOUTUBE_API_KEY_VAR, hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = OPENAI_API_KEY_VAR, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// YouTube Data API base URL
    #[arg(long, default_value = DEFAULT_YOUTUBE_BASE_URL)]
    pub youtube_base_url: String,

    /// OpenAI-compatible API base URL
    #[arg(long, default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// HTTP request timeout in seconds (1-300)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=300))]
    pub request_timeout: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn runs_fetch(&self) -> bool {
        matches!(self.stage.as_str(), "fetch" | "all")
    }

    pub fn runs_process(&self) -> bool {
        matches!(self.stage.as_str(), "process" | "all")
    }

    pub fn runs_analyze(&self) -> bool {
        matches!(self.stage.as_str(), "analyze" | "all")
    }

    /// The YouTube key, or [`CommentError::MissingCredential`] when absent
    /// or blank.
    pub fn require_youtube_key(&self) -> Result<&str> {
        require(self.youtube_api_key.as_deref(), YOUTUBE_API_KEY_VAR)
    }

    /// The OpenAI key, or [`CommentError::MissingCredential`] when absent
    /// or blank.
    pub fn require_openai_key(&self) -> Result<&str> {
        require(self.openai_api_key.as_deref(), OPENAI_API_KEY_VAR)
    }

    /// Check values clap cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("youtube-base-url", &self.youtube_base_url),
            ("openai-base-url", &self.openai_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CommentError::Config(format!(
                    "--{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }
        if self.model.trim().is_empty() {
            return Err(CommentError::Config("--model must not be empty".to_string()));
        }
        Ok(())
    }
}

fn require<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CommentError::MissingCredential(var.to_string())),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
