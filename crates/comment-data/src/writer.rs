//! Stage output layout and file writers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use comment_core::error::{CommentError, Result};
use comment_core::models::Comment;
use serde::Serialize;
use tracing::{debug, info};

/// Directory names under the output root, one per stage.
pub const RAW_DIR: &str = "raw_comments";
pub const PROCESSED_DIR: &str = "processed_comments";
pub const ANALYSIS_DIR: &str = "analysis_results";

// ── OutputLayout ──────────────────────────────────────────────────────────────

/// Where each stage reads from and writes to.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_DIR)
    }

    pub fn analysis_dir(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR)
    }

    /// Create the three stage directories (and the root) if absent.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.raw_dir(), self.processed_dir(), self.analysis_dir()] {
            std::fs::create_dir_all(&dir).map_err(|source| CommentError::FileWrite {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// `raw_comments/youtube_comments_<ts>.json` and its `.csv` sibling.
    pub fn raw_paths(&self, stamp: &str) -> (PathBuf, PathBuf) {
        let base = format!("youtube_comments_{}", stamp);
        (
            self.raw_dir().join(format!("{}.json", base)),
            self.raw_dir().join(format!("{}.csv", base)),
        )
    }

    /// `processed_comments/analysis_results_<ts>.json`.
    pub fn processed_path(&self, stamp: &str) -> PathBuf {
        self.processed_dir()
            .join(format!("analysis_results_{}.json", stamp))
    }

    /// `analysis_results/analysis_<ts>.txt`.
    pub fn report_path(&self, stamp: &str) -> PathBuf {
        self.analysis_dir().join(format!("analysis_{}.txt", stamp))
    }
}

// ── Timestamps ────────────────────────────────────────────────────────────────

/// Filename stamp for `now` in local time, e.g. `20240115_103000`.
pub fn file_stamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Filename stamp for the current local time.
pub fn current_stamp() -> String {
    file_stamp(Local::now())
}

// ── Writers ───────────────────────────────────────────────────────────────────

/// Pretty-print `value` as JSON to `path`.
///
/// Non-ASCII text is written as-is (UTF-8), not escaped.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())?;
    debug!("Wrote JSON to {}", path.display());
    Ok(())
}

/// Write `comments` as CSV with a header row.
///
/// Returns `false` without touching the filesystem when there is nothing to
/// write.
pub fn write_comments_csv(path: &Path, comments: &[Comment]) -> Result<bool> {
    if comments.is_empty() {
        info!("No comments to save to CSV");
        return Ok(false);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for comment in comments {
        writer.serialize(comment)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CommentError::Csv(e.into_error().into()))?;

    write_atomic(path, &bytes)?;
    debug!("Wrote {} CSV rows to {}", comments.len(), path.display());
    Ok(true)
}

/// Write a UTF-8 text document to `path`.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    write_atomic(path, text.as_bytes())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Write to a temp file next to `path` then rename it into place, creating
/// parent directories if needed.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let to_err = |source| CommentError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes).map_err(to_err)?;
    std::fs::rename(&tmp, path).map_err(to_err)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
