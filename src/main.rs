use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booktape::AppError;
use booktape::domain::pipeline::{DocumentOutcome, PipelineService, RunSummary};
use booktape::domain::shared::RunStatistics;
use booktape::infrastructure::audio::Mp3Codec;
use booktape::infrastructure::config::{Config, LogFormat, TtsProvider};
use booktape::infrastructure::extractors::ExtractorRegistry;
use booktape::infrastructure::repositories::{
    OpenAiTtsRepository, PollyTtsRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env().map_err(AppError::from) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        provider = ?config.provider,
        voice = %config.voice,
        chunk_max_chars = config.chunk_max_chars,
        max_segment_minutes = config.max_segment_minutes,
        "Starting booktape"
    );

    let tts_repo: Arc<dyn TtsRepository> = match config.provider {
        TtsProvider::OpenAi => {
            let api_key = config
                .openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required for the openai provider")?;
            Arc::new(OpenAiTtsRepository::from_api_key(
                api_key,
                config.tts_model.clone(),
            ))
        }
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);
            Arc::new(PollyTtsRepository::from_region(&config.aws_region).await)
        }
    };
    tracing::info!(provider = tts_repo.provider(), "TTS client initialized");

    if config.chunk_max_chars > tts_repo.max_input_chars() {
        anyhow::bail!(
            "CHUNK_MAX_CHARS={} exceeds the {} request limit of {} characters",
            config.chunk_max_chars,
            tts_repo.provider(),
            tts_repo.max_input_chars()
        );
    }

    let stats = Arc::new(RunStatistics::new());
    let pipeline = PipelineService::new(
        config.pipeline_settings(),
        ExtractorRegistry::default(),
        tts_repo,
        Arc::new(Mp3Codec::new()),
        stats,
    );

    let summary = pipeline.run().await.context("pipeline run failed")?;
    report(&config, &summary)?;

    Ok(())
}

fn report(config: &Config, summary: &RunSummary) -> anyhow::Result<()> {
    tracing::info!(
        documents = summary.documents.len(),
        completed = summary.completed(),
        incomplete = summary.incomplete(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        api_calls = summary.usage.api_calls,
        characters_sent = summary.usage.characters_sent,
        segments_produced = summary.usage.segments_produced,
        "Run finished"
    );

    if config.log_format == LogFormat::Json {
        println!("{}", serde_json::to_string(summary)?);
        return Ok(());
    }

    for document in &summary.documents {
        let status = match &document.outcome {
            DocumentOutcome::Completed { segments } => format!("completed, {} segment(s)", segments),
            DocumentOutcome::Incomplete { missing, total } => {
                format!("incomplete, {} of {} chunk(s) missing", missing, total)
            }
            DocumentOutcome::Skipped { reason } => format!("skipped: {}", reason),
            DocumentOutcome::Failed { error } => format!("failed: {}", error),
        };
        println!("{}: {}", document.source.display(), status);
    }
    println!(
        "Synthesized {:.1} minute(s) of audio in {} API call(s).",
        summary.usage.synthesized_minutes(),
        summary.usage.api_calls
    );

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "booktape=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "booktape=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
