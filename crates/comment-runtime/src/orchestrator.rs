//! Stage orchestration.
//!
//! [`Pipeline`] owns the output layout and the per-stage limits. Each stage
//! can run on its own, picking the newest file from the previous stage's
//! directory, or all three can be chained with [`Pipeline::run_all`], in
//! which case each stage reads exactly the file the previous one wrote.

use std::path::{Path, PathBuf};

use comment_core::error::Result;
use comment_core::models::ProcessedComment;
use comment_core::settings::Settings;
use comment_data::reader::{load_processed, read_video_list, resolve_input};
use comment_data::report::{build_report, render_likes_table};
use comment_data::writer::{current_stamp, write_text, OutputLayout};
use tracing::{info, warn};

use crate::fetcher::{FetchOutcome, Fetcher};
use crate::llm::ChatClient;
use crate::processor::{ProcessOutcome, Processor};
use crate::youtube::CommentSource;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Limits and locations shared by all stages.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub max_comments_per_video: usize,
    pub max_process: usize,
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output_dir"),
            max_comments_per_video: 200,
            max_process: 1000,
            top_n: 10,
        }
    }
}

impl From<&Settings> for PipelineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            output_dir: settings.output_dir.clone(),
            max_comments_per_video: settings.max_comments as usize,
            max_process: settings.max_process as usize,
            top_n: settings.top_n as usize,
        }
    }
}

/// Video inputs from the command line, or from the URL list file when none
/// were given.
pub fn resolve_video_inputs(videos: &[String], urls_file: &Path) -> Result<Vec<String>> {
    if !videos.is_empty() {
        return Ok(videos.to_vec());
    }
    let list = read_video_list(urls_file)?;
    info!("Read {} video entries from {}", list.len(), urls_file.display());
    Ok(list)
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What an analyze run produced.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub input_path: PathBuf,
    /// `None` when the input held no comments.
    pub report_path: Option<PathBuf>,
    pub comments: Vec<ProcessedComment>,
}

impl AnalyzeOutcome {
    /// Console listing of the analysed comments by likes.
    pub fn likes_table(&self) -> String {
        render_likes_table(&self.comments)
    }
}

/// Outcome of a chained run; later stages are `None` when an earlier one had
/// nothing to hand on.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub fetch: Option<FetchOutcome>,
    pub process: Option<ProcessOutcome>,
    pub analyze: Option<AnalyzeOutcome>,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

pub struct Pipeline {
    config: PipelineConfig,
    layout: OutputLayout,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let layout = OutputLayout::new(&config.output_dir);
        Self { config, layout }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Stage 1.
    pub async fn fetch<S: CommentSource + ?Sized>(
        &self,
        source: &S,
        inputs: &[String],
    ) -> Result<FetchOutcome> {
        info!("Starting comment fetch for {} inputs", inputs.len());
        Fetcher::new(source, &self.layout, self.config.max_comments_per_video)
            .run(inputs)
            .await
    }

    /// Stage 2. Reads `input`, or the newest raw comments file.
    pub async fn process<C: ChatClient + ?Sized>(
        &self,
        chat: &C,
        input: Option<&Path>,
    ) -> Result<ProcessOutcome> {
        let input = resolve_input(input, &self.layout.raw_dir())?;
        Processor::new(chat, &self.layout, self.config.max_process)
            .run(&input)
            .await
    }

    /// Stage 3. Reads `input`, or the newest processed comments file, and
    /// writes the text report.
    pub fn analyze(&self, input: Option<&Path>) -> Result<AnalyzeOutcome> {
        let input_path = resolve_input(input, &self.layout.processed_dir())?;
        info!("Loading processed comments from {}", input_path.display());
        let comments = load_processed(&input_path)?;

        let report_path = match build_report(&comments, self.config.top_n) {
            Some(report) => {
                let path = self.layout.report_path(&current_stamp());
                write_text(&path, &report)?;
                info!("Analysis report saved to {}", path.display());
                Some(path)
            }
            None => {
                warn!("No comments data available for analysis");
                None
            }
        };

        Ok(AnalyzeOutcome {
            input_path,
            report_path,
            comments,
        })
    }

    /// Run fetch, process and analyze back to back.
    ///
    /// Stops early, without error, when fetch collects nothing.
    pub async fn run_all<S, C>(&self, source: &S, chat: &C, inputs: &[String]) -> Result<RunSummary>
    where
        S: CommentSource + ?Sized,
        C: ChatClient + ?Sized,
    {
        let mut summary = RunSummary::default();

        let fetched = self.fetch(source, inputs).await?;
        let raw_path = fetched.json_path.clone();
        summary.fetch = Some(fetched);
        let Some(raw_path) = raw_path else {
            warn!("Nothing fetched; skipping process and analyze stages");
            return Ok(summary);
        };

        let processed = self.process(chat, Some(&raw_path)).await?;
        let processed_path = processed.output_path.clone();
        summary.process = Some(processed);

        summary.analyze = Some(self.analyze(Some(&processed_path))?);
        Ok(summary)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CLASSIFY_SYSTEM_PROMPT;
    use crate::youtube::CommentPage;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use comment_core::error::CommentError;
    use comment_core::models::{Comment, Sentiment};
    use comment_data::writer::write_json;
    use tempfile::TempDir;

    // ── Fakes ─────────────────────────────────────────────────────────────────

    struct FakeSource {
        texts: Vec<(&'static str, u64)>,
    }

    #[async_trait]
    impl CommentSource for FakeSource {
        async fn fetch_page(
            &self,
            video_id: &str,
            _page_token: Option<&str>,
            page_size: u32,
        ) -> Result<CommentPage> {
            let comments = self
                .texts
                .iter()
                .take(page_size as usize)
                .enumerate()
                .map(|(i, (text, likes))| Comment {
                    video_id: video_id.to_string(),
                    comment_id: format!("c{}", i),
                    author: format!("user{}", i),
                    text: text.to_string(),
                    likes: *likes,
                    published_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
                    reply_count: 0,
                })
                .collect();
            Ok(CommentPage {
                comments,
                next_page_token: None,
            })
        }
    }

    /// Echoes the text on translate; questions end with `?`, else positive.
    struct FakeChat;

    #[async_trait]
    impl ChatClient for FakeChat {
        async fn complete(&self, system: &str, user: &str) -> Result<String> {
            if system == CLASSIFY_SYSTEM_PROMPT {
                let label = if user.trim_end().ends_with('?') {
                    "question"
                } else {
                    "positive affirmation"
                };
                return Ok(label.to_string());
            }
            Ok(user
                .trim_start_matches("Clean and translate if necessary: ")
                .to_string())
        }
    }

    struct DeadSource;

    #[async_trait]
    impl CommentSource for DeadSource {
        async fn fetch_page(&self, _: &str, _: Option<&str>, _: u32) -> Result<CommentPage> {
            Err(CommentError::Network("dns error".to_string()))
        }
    }

    fn pipeline(root: &Path) -> Pipeline {
        Pipeline::new(PipelineConfig {
            output_dir: root.to_path_buf(),
            top_n: 2,
            ..PipelineConfig::default()
        })
    }

    fn source() -> FakeSource {
        FakeSource {
            texts: vec![
                ("What are the fees for withdrawal?", 3),
                ("Great app, works in Egypt", 9),
                ("Customer service was quick", 1),
            ],
        }
    }

    // ── run_all ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_run_all_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let pipeline = pipeline(tmp.path());
        pipeline.layout().ensure_dirs().unwrap();

        let summary = pipeline
            .run_all(&source(), &FakeChat, &["dQw4w9WgXcQ".to_string()])
            .await
            .unwrap();

        let fetch = summary.fetch.unwrap();
        assert_eq!(fetch.comments, 3);

        let process = summary.process.unwrap();
        assert_eq!(Some(process.input_path.clone()), fetch.json_path);
        assert_eq!(process.distribution.counts.get(Sentiment::Question), 1);
        assert_eq!(process.distribution.counts.get(Sentiment::PositiveAffirmation), 2);

        let analyze = summary.analyze.unwrap();
        assert_eq!(analyze.input_path, process.output_path);
        let report = std::fs::read_to_string(analyze.report_path.as_ref().unwrap()).unwrap();
        assert!(report.contains("Total Comments Analyzed: 3"));
        assert!(report.contains("Fees: 1 (33.33%) [Q:1, +:0, =:0, -:0]"));
        assert!(report.contains("Egypt: 1 (33.33%)"));
        assert!(report.contains("=== Top 2 Most Liked Comments ==="));
        assert!(!report.contains("#3 Most Liked"));

        let table = analyze.likes_table();
        assert!(table.lines().nth(2).unwrap().starts_with("user1"));
    }

    #[tokio::test]
    async fn test_run_all_stops_when_nothing_fetched() {
        let tmp = TempDir::new().unwrap();
        let pipeline = pipeline(tmp.path());

        let summary = pipeline
            .run_all(&DeadSource, &FakeChat, &["dQw4w9WgXcQ".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.fetch.unwrap().videos_skipped, 1);
        assert!(summary.process.is_none());
        assert!(summary.analyze.is_none());
    }

    // ── Individual stages ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_process_without_raw_files_errors() {
        let tmp = TempDir::new().unwrap();
        let pipeline = pipeline(tmp.path());
        pipeline.layout().ensure_dirs().unwrap();

        let err = pipeline.process(&FakeChat, None).await.unwrap_err();
        assert!(matches!(err, CommentError::NoInputFiles(_)));
    }

    #[test]
    fn test_analyze_picks_latest_processed_file() {
        let tmp = TempDir::new().unwrap();
        let pipeline = pipeline(tmp.path());
        let path = pipeline
            .layout()
            .processed_dir()
            .join("analysis_results_20240115_100000.json");
        let record = serde_json::json!({"comments": [{
            "video_id": "v", "author": "a", "text": "fee?", "likes": 2,
            "published_at": "2024-01-15T10:00:00Z",
            "cleaned_text": "fee?", "sentiment": "question"
        }]});
        write_json(&path, &record).unwrap();

        let outcome = pipeline.analyze(None).unwrap();
        assert_eq!(outcome.input_path, path);
        assert_eq!(outcome.comments.len(), 1);
        let report_path = outcome.report_path.unwrap();
        assert!(report_path.starts_with(pipeline.layout().analysis_dir()));
    }

    #[test]
    fn test_analyze_empty_batch_writes_no_report() {
        let tmp = TempDir::new().unwrap();
        let pipeline = pipeline(tmp.path());
        let path = tmp.path().join("empty.json");
        write_json(&path, &serde_json::json!({"comments": []})).unwrap();

        let outcome = pipeline.analyze(Some(&path)).unwrap();
        assert!(outcome.report_path.is_none());
        assert!(!pipeline.layout().analysis_dir().exists());
    }

    // ── resolve_video_inputs ──────────────────────────────────────────────────

    #[test]
    fn test_resolve_video_inputs_prefers_cli() {
        let inputs = resolve_video_inputs(
            &["abcdefghijk".to_string()],
            Path::new("/nonexistent/youtube_urls.txt"),
        )
        .unwrap();
        assert_eq!(inputs, vec!["abcdefghijk"]);
    }

    #[test]
    fn test_resolve_video_inputs_reads_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("youtube_urls.txt");
        std::fs::write(&file, "https://youtu.be/dQw4w9WgXcQ\n").unwrap();
        assert_eq!(
            resolve_video_inputs(&[], &file).unwrap(),
            vec!["https://youtu.be/dQw4w9WgXcQ"]
        );
        assert!(resolve_video_inputs(&[], &tmp.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings::load_from(["yt-comments", "--max-comments", "50", "--top-n", "3"]);
        let config = PipelineConfig::from(&settings);
        assert_eq!(config.max_comments_per_video, 50);
        assert_eq!(config.max_process, 1000);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.output_dir, PathBuf::from("output_dir"));
    }
}
