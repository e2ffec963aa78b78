mod bootstrap;

use std::time::Duration;

use anyhow::Result;
use comment_core::models::Sentiment;
use comment_core::settings::Settings;
use comment_runtime::fetcher::FetchOutcome;
use comment_runtime::llm::OpenAiClient;
use comment_runtime::orchestrator::{resolve_video_inputs, AnalyzeOutcome, Pipeline, PipelineConfig};
use comment_runtime::processor::ProcessOutcome;
use comment_runtime::youtube::YouTubeClient;

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = bootstrap::load_env();
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;
    settings.validate()?;

    tracing::info!("yt-comments v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    tracing::info!(
        "Stage: {}, Output: {}",
        settings.stage,
        settings.output_dir.display()
    );

    // Fail on missing credentials before any network call.
    if settings.runs_fetch() {
        settings.require_youtube_key()?;
    }
    if settings.runs_process() {
        settings.require_openai_key()?;
    }

    bootstrap::ensure_directories(&settings.output_dir)?;
    let pipeline = Pipeline::new(PipelineConfig::from(&settings));

    match settings.stage.as_str() {
        "fetch" => {
            let source = youtube_client(&settings)?;
            let inputs = resolve_video_inputs(&settings.videos, &settings.urls_file)?;
            let outcome = pipeline.fetch(&source, &inputs).await?;
            print_fetch(&outcome);
        }

        "process" => {
            let chat = chat_client(&settings)?;
            let outcome = pipeline.process(&chat, settings.input.as_deref()).await?;
            print_process(&outcome);
        }

        "analyze" => {
            let outcome = pipeline.analyze(settings.input.as_deref())?;
            print_analyze(&outcome);
        }

        "all" => {
            if settings.input.is_some() {
                tracing::warn!("--input is ignored when running all stages");
            }
            let source = youtube_client(&settings)?;
            let chat = chat_client(&settings)?;
            let inputs = resolve_video_inputs(&settings.videos, &settings.urls_file)?;

            let summary = pipeline.run_all(&source, &chat, &inputs).await?;
            if let Some(outcome) = &summary.fetch {
                print_fetch(outcome);
            }
            if let Some(outcome) = &summary.process {
                print_process(outcome);
            }
            if let Some(outcome) = &summary.analyze {
                print_analyze(outcome);
            }
        }

        unknown => {
            eprintln!("Unknown stage: {}", unknown);
        }
    }

    Ok(())
}

// ── Clients ────────────────────────────────────────────────────────────────────

fn youtube_client(settings: &Settings) -> Result<YouTubeClient> {
    Ok(YouTubeClient::new(
        &settings.youtube_base_url,
        settings.require_youtube_key()?,
        Duration::from_secs(settings.request_timeout),
    )?)
}

fn chat_client(settings: &Settings) -> Result<OpenAiClient> {
    let client = OpenAiClient::new(
        &settings.openai_base_url,
        settings.require_openai_key()?,
        &settings.model,
        Duration::from_secs(settings.request_timeout),
    )?;
    tracing::info!("Using model {}", client.model());
    Ok(client)
}

// ── Console summaries ──────────────────────────────────────────────────────────

fn print_fetch(outcome: &FetchOutcome) {
    println!(
        "Fetched {} comments from {} videos ({} skipped)",
        outcome.comments, outcome.videos_fetched, outcome.videos_skipped
    );
    match (&outcome.json_path, &outcome.csv_path) {
        (Some(json), Some(csv)) => {
            println!("Comments saved to {} and {}", json.display(), csv.display())
        }
        (Some(json), None) => println!("Comments saved to {}", json.display()),
        _ => println!("No comments were saved"),
    }
}

fn print_process(outcome: &ProcessOutcome) {
    let dist = &outcome.distribution;
    println!();
    println!("Analysis Summary:");
    println!("Total comments processed: {}", outcome.processed);
    for sentiment in Sentiment::ALL {
        println!(
            "{}: {} ({:.2}%)",
            sentiment.label(),
            dist.counts.get(sentiment),
            dist.percentage(sentiment)
        );
    }
    println!("Results saved to {}", outcome.output_path.display());
}

fn print_analyze(outcome: &AnalyzeOutcome) {
    match &outcome.report_path {
        Some(path) => {
            println!();
            println!("Analysis report saved to {}", path.display());
            println!();
            println!("{}", outcome.likes_table());
        }
        None => println!("No comments data available for analysis"),
    }
}
