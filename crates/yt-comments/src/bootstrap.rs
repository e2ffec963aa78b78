use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use comment_data::writer::OutputLayout;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Environment bootstrap ──────────────────────────────────────────────────────

/// Load a `.env` file from the working directory (or a parent) if present.
///
/// Returns the path that was loaded. Variables already set in the process
/// environment win.
pub fn load_env() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the output hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `<output_dir>/raw_comments/`
/// - `<output_dir>/processed_comments/`
/// - `<output_dir>/analysis_results/`
pub fn ensure_directories(output_dir: &Path) -> anyhow::Result<()> {
    OutputLayout::new(output_dir)
        .ensure_dirs()
        .with_context(|| format!("creating output directories under {}", output_dir.display()))
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map an upper-case level name (`DEBUG`, `WARNING`, `CRITICAL`, ...) to a
/// tracing filter directive.
///
/// Unknown names are passed through unchanged so `EnvFilter` syntax such as
/// `comment_runtime=debug` also works.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr. When `log_file` is given the same events are appended
/// to it, without ANSI colours. Falls back to `"info"` if the level string is
/// not a valid filter.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let directive = level_directive(log_level);
    let filter = EnvFilter::try_new(format!("{},hyper=warn,reqwest=warn", directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");
        let output_dir = tmp.path().join("output_dir");

        ensure_directories(&output_dir).expect("ensure_directories should succeed");

        assert!(output_dir.join("raw_comments").is_dir());
        assert!(output_dir.join("processed_comments").is_dir());
        assert!(output_dir.join("analysis_results").is_dir());
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories(tmp.path()).expect("first call");
        ensure_directories(tmp.path()).expect("second call");
    }

    #[test]
    fn test_level_directive_maps_level_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
    }

    #[test]
    fn test_level_directive_passes_through_filters() {
        assert_eq!(
            level_directive("comment_runtime=trace"),
            "comment_runtime=trace"
        );
    }
}
