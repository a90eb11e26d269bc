use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use super::error::SynthesisError;
use crate::domain::document::{Chunk, Document, DocumentLayout};
use crate::domain::shared::RunStatistics;
use crate::infrastructure::audio::{AudioClip, AudioCodec};
use crate::infrastructure::repositories::{ArtifactRepository, TtsRepository};

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub voice: String,
    pub concurrency: usize,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

#[derive(Debug)]
pub struct ChunkFailure {
    pub index: usize,
    pub error: SynthesisError,
}

/// Outcome of one dispatch round for a document.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub synthesized: Vec<usize>,
    pub failed: Vec<ChunkFailure>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fills a document's missing chunk artifacts through the TTS provider.
///
/// Calls for different chunks run concurrently, bounded by `concurrency`. A chunk
/// that keeps failing is left without an artifact so the next run retries exactly it.
pub struct SynthesisService {
    tts_repo: Arc<dyn TtsRepository>,
    codec: Arc<dyn AudioCodec>,
    artifacts: ArtifactRepository,
    stats: Arc<RunStatistics>,
    settings: DispatchSettings,
}

impl SynthesisService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        codec: Arc<dyn AudioCodec>,
        artifacts: ArtifactRepository,
        stats: Arc<RunStatistics>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            tts_repo,
            codec,
            artifacts,
            stats,
            settings,
        }
    }

    /// Synthesize the chunks at `missing` and store their artifacts.
    pub async fn dispatch(
        &self,
        document: &Document,
        layout: &DocumentLayout,
        missing: &[usize],
    ) -> DispatchReport {
        tracing::info!(
            document = %document.name,
            provider = self.tts_repo.provider(),
            voice = %self.settings.voice,
            missing = missing.len(),
            total = document.total_chunks(),
            concurrency = self.settings.concurrency,
            "Dispatching synthesis"
        );

        let results: Vec<(usize, Result<(), SynthesisError>)> =
            stream::iter(missing.iter().filter_map(|&i| document.chunks.get(i)))
                .map(|chunk| async move {
                    let result = self.synthesize_chunk(document, layout, chunk).await;
                    (chunk.index, result)
                })
                .buffer_unordered(self.settings.concurrency.max(1))
                .collect()
                .await;

        let mut report = DispatchReport::default();
        for (index, result) in results {
            match result {
                Ok(()) => report.synthesized.push(index),
                Err(error) => report.failed.push(ChunkFailure { index, error }),
            }
        }
        report.synthesized.sort_unstable();
        report.failed.sort_by_key(|f| f.index);
        report
    }

    async fn synthesize_chunk(
        &self,
        document: &Document,
        layout: &DocumentLayout,
        chunk: &Chunk,
    ) -> Result<(), SynthesisError> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_synthesize(layout, chunk).await {
                Ok(clip) => {
                    self.stats.record_synthesis(chunk.char_count(), clip.duration_ms);
                    tracing::info!(
                        document = %document.name,
                        chunk = chunk.index + 1,
                        total = document.total_chunks(),
                        duration_ms = clip.duration_ms,
                        attempt,
                        "Saved {}",
                        chunk.file_name
                    );
                    return Ok(());
                }
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    let backoff = self
                        .settings
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt - 1));
                    tracing::warn!(
                        document = %document.name,
                        chunk = chunk.index + 1,
                        attempt,
                        max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %error,
                        "Synthesis attempt failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!(
                        document = %document.name,
                        chunk = chunk.index + 1,
                        attempt,
                        error = %error,
                        "Failed to generate speech for {}",
                        chunk.file_name
                    );
                    return Err(error);
                }
            }
        }
    }

    /// One provider call: fetch, measure, then store atomically.
    async fn try_synthesize(
        &self,
        layout: &DocumentLayout,
        chunk: &Chunk,
    ) -> Result<AudioClip, SynthesisError> {
        let bytes = self
            .tts_repo
            .synthesize(&chunk.text, &self.settings.voice)
            .await
            .map_err(SynthesisError::Provider)?;

        let clip = self.codec.decode(bytes)?;

        let path = layout.chunk_path(chunk);
        self.artifacts
            .write_atomic(&path, &clip.bytes)
            .await
            .map_err(|source| SynthesisError::Store { path, source })?;

        Ok(clip)
    }
}
