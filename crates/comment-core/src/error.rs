use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the comment pipeline.
#[derive(Error, Debug)]
pub enum CommentError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stage output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A CSV record could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Neither a bare video id nor any recognised YouTube URL shape.
    #[error("Could not extract video ID from URL: {0}")]
    InvalidVideoUrl(String),

    /// A credential required by the requested stage was not supplied.
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// The stage directory holds no JSON file to pick up.
    #[error("No JSON files found in {0}")]
    NoInputFiles(PathBuf),

    /// A remote API answered with a non-success status.
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: String,
        status: u16,
        message: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommentError {
    /// `true` for failures that came from talking to a remote service.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            CommentError::Api { .. } | CommentError::Network(_) | CommentError::MalformedResponse(_)
        )
    }
}

/// Convenience alias used throughout the comment crates.
pub type Result<T> = std::result::Result<T, CommentError>;
