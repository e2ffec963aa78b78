//! Stage input discovery and loading.
//!
//! Each stage reads the newest JSON file written by the previous one, unless
//! an explicit path is supplied. The fetch stage additionally reads a plain
//! list of video URLs.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use comment_core::error::{CommentError, Result};
use comment_core::models::{Comment, ProcessedBatch, ProcessedComment};
use serde::Deserialize;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` files directly inside `dir`, sorted by path.
pub fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Input directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// The most recently modified `.json` file in `dir`.
///
/// Ties on modification time are broken by path so the choice is stable.
pub fn find_latest_json(dir: &Path) -> Result<PathBuf> {
    let files = find_json_files(dir);

    files
        .into_iter()
        .map(|path| {
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .max()
        .map(|(_, path)| path)
        .ok_or_else(|| CommentError::NoInputFiles(dir.to_path_buf()))
}

/// Use `explicit` when given, otherwise the newest JSON file in `dir`.
pub fn resolve_input(explicit: Option<&Path>, dir: &Path) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => find_latest_json(dir),
    }
}

/// Load the raw comment array written by the fetch stage.
pub fn load_comments(path: &Path) -> Result<Vec<Comment>> {
    let content = read_file(path)?;
    let comments: Vec<Comment> = serde_json::from_str(&content)?;
    debug!("Loaded {} comments from {}", comments.len(), path.display());
    Ok(comments)
}

/// Load processed comments.
///
/// Accepts the `{"comments": [...]}` envelope the process stage writes, or a
/// bare array of records.
pub fn load_processed(path: &Path) -> Result<Vec<ProcessedComment>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ProcessedFile {
        Batch(ProcessedBatch),
        Bare(Vec<ProcessedComment>),
    }

    let content = read_file(path)?;
    let comments = match serde_json::from_str::<ProcessedFile>(&content) {
        Ok(ProcessedFile::Batch(batch)) => batch.comments,
        Ok(ProcessedFile::Bare(list)) => list,
        // Re-parse strictly to surface a useful error message.
        Err(_) => serde_json::from_str::<ProcessedBatch>(&content)?.comments,
    };
    debug!(
        "Loaded {} processed comments from {}",
        comments.len(),
        path.display()
    );
    Ok(comments)
}

/// Read video URLs (or ids) from a list file.
///
/// One entry per line; surrounding whitespace is trimmed and blank lines or
/// lines starting with `#` are skipped.
pub fn read_video_list(path: &Path) -> Result<Vec<String>> {
    let content = read_file(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CommentError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn set_mtime(path: &Path, secs_after_epoch: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
    }

    const RAW: &str = r#"[
        {"video_id": "dQw4w9WgXcQ", "author": "a", "text": "fee?", "likes": 4,
         "published_at": "2024-01-15T10:00:00Z"},
        {"video_id": "dQw4w9WgXcQ", "comment_id": "Ug2", "author": "b", "text": "great",
         "likes": 0, "published_at": "2024-01-16T10:00:00Z", "reply_count": 3}
    ]"#;

    // ── find_json_files ───────────────────────────────────────────────────────

    #[test]
    fn test_find_json_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.json", "[]");
        write(dir.path(), "a.json", "[]");
        write(dir.path(), "notes.csv", "x");

        let files = find_json_files(dir.path());
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_find_json_files_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir_all(&sub).unwrap();
        write(&sub, "deep.json", "[]");

        assert!(find_json_files(dir.path()).is_empty());
    }

    #[test]
    fn test_find_json_files_missing_dir() {
        let files = find_json_files(Path::new("/tmp/does-not-exist-yt-comments-xyz"));
        assert!(files.is_empty());
    }

    // ── find_latest_json ──────────────────────────────────────────────────────

    #[test]
    fn test_find_latest_json_uses_mtime() {
        let dir = TempDir::new().unwrap();
        let older = write(dir.path(), "z_old.json", "[]");
        let newer = write(dir.path(), "a_new.json", "[]");
        set_mtime(&older, 1_000);
        set_mtime(&newer, 2_000);

        assert_eq!(find_latest_json(dir.path()).unwrap(), newer);
    }

    #[test]
    fn test_find_latest_json_empty_dir_errors() {
        let dir = TempDir::new().unwrap();
        let err = find_latest_json(dir.path()).unwrap_err();
        assert!(matches!(err, CommentError::NoInputFiles(p) if p == dir.path()));
    }

    #[test]
    fn test_resolve_input_prefers_explicit() {
        let dir = TempDir::new().unwrap();
        let explicit = PathBuf::from("/somewhere/else.json");
        assert_eq!(
            resolve_input(Some(&explicit), dir.path()).unwrap(),
            explicit
        );
    }

    // ── load_comments ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_comments() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "raw.json", RAW);

        let comments = load_comments(&path).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].likes, 4);
        assert_eq!(comments[1].reply_count, 3);
        assert_eq!(comments[1].comment_id, "Ug2");
    }

    #[test]
    fn test_load_comments_missing_file() {
        let err = load_comments(Path::new("/tmp/nope-yt-comments.json")).unwrap_err();
        assert!(matches!(err, CommentError::FileRead { .. }));
    }

    #[test]
    fn test_load_comments_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "bad.json", "{not json");
        assert!(matches!(
            load_comments(&path).unwrap_err(),
            CommentError::JsonParse(_)
        ));
    }

    // ── load_processed ────────────────────────────────────────────────────────

    #[test]
    fn test_load_processed_envelope_and_bare() {
        let record = r#"{"video_id": "v", "author": "a", "text": "t", "likes": 1,
            "published_at": "2024-01-15T10:00:00Z", "cleaned_text": "t",
            "sentiment": "question"}"#;
        let dir = TempDir::new().unwrap();
        let wrapped = write(dir.path(), "w.json", &format!("{{\"comments\": [{}]}}", record));
        let bare = write(dir.path(), "b.json", &format!("[{}]", record));

        assert_eq!(load_processed(&wrapped).unwrap().len(), 1);
        assert_eq!(load_processed(&bare).unwrap().len(), 1);
    }

    #[test]
    fn test_load_processed_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"rows": 3}"#);
        assert!(load_processed(&path).is_err());
    }

    // ── read_video_list ───────────────────────────────────────────────────────

    #[test]
    fn test_read_video_list_skips_blank_and_comments() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "youtube_urls.txt",
            "https://youtu.be/dQw4w9WgXcQ\n\n  # later\n  abcdefghijk  \n",
        );
        let list = read_video_list(&path).unwrap();
        assert_eq!(list, vec!["https://youtu.be/dQw4w9WgXcQ", "abcdefghijk"]);
    }
}
