use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::model::{DocumentOutcome, DocumentReport, PipelineSettings, RunSummary};
use crate::domain::document::{document_name, Document, DocumentLayout};
use crate::domain::finalize::FinalizeService;
use crate::domain::merge::MergeService;
use crate::domain::shared::RunStatistics;
use crate::domain::synthesis::{DispatchSettings, SynthesisService};
use crate::error::AppResult;
use crate::infrastructure::audio::AudioCodec;
use crate::infrastructure::extractors::ExtractorRegistry;
use crate::infrastructure::repositories::{ArtifactRepository, TtsRepository};

/// Drives every source document through chunking, synthesis, merge and finalize.
pub struct PipelineService {
    settings: PipelineSettings,
    extractors: ExtractorRegistry,
    artifacts: ArtifactRepository,
    synthesis: SynthesisService,
    merge: MergeService,
    finalize: FinalizeService,
    stats: Arc<RunStatistics>,
}

impl PipelineService {
    pub fn new(
        settings: PipelineSettings,
        extractors: ExtractorRegistry,
        tts_repo: Arc<dyn TtsRepository>,
        codec: Arc<dyn AudioCodec>,
        stats: Arc<RunStatistics>,
    ) -> Self {
        let artifacts = ArtifactRepository::new();
        let synthesis = SynthesisService::new(
            tts_repo,
            codec.clone(),
            artifacts,
            stats.clone(),
            DispatchSettings {
                voice: settings.voice.clone(),
                concurrency: settings.synthesis_concurrency,
                max_attempts: settings.synthesis_max_attempts,
                retry_backoff: settings.synthesis_retry_backoff,
            },
        );
        let merge = MergeService::new(codec, artifacts);
        let finalize =
            FinalizeService::new(artifacts, &settings.done_dir, settings.delete_intermediate);

        Self {
            settings,
            extractors,
            artifacts,
            synthesis,
            merge,
            finalize,
            stats,
        }
    }

    /// Process every document in the sources directory.
    ///
    /// Per-document failures are recorded in the summary; only being unable to set up
    /// or list the working directories fails the run.
    pub async fn run(&self) -> AppResult<RunSummary> {
        for dir in [
            &self.settings.sources_dir,
            &self.settings.downloads_dir,
            &self.settings.outputs_dir,
            &self.settings.done_dir,
        ] {
            tokio::fs::create_dir_all(dir).await?;
        }

        let sources = self.discover_sources().await?;
        tracing::info!("Found {} files to process.", sources.len());

        // Sources sharing a stem would share one chunk directory and output directory.
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();
        let mut documents = Vec::with_capacity(sources.len());
        for source in sources {
            let name = document_name(&source);
            let outcome = match claimed.get(&name) {
                Some(owner) => {
                    tracing::error!(
                        source = %source.display(),
                        owner = %owner.display(),
                        document = %name,
                        "Document name already taken by another source, skipping"
                    );
                    DocumentOutcome::Skipped {
                        reason: format!(
                            "document name '{}' is already used by {}",
                            name,
                            owner.display()
                        ),
                    }
                }
                None => {
                    claimed.insert(name, source.clone());
                    tracing::info!("Processing file: {}", source.display());
                    self.process_document(&source).await
                }
            };
            documents.push(DocumentReport { source, outcome });
        }

        Ok(RunSummary {
            usage: self.stats.snapshot(),
            documents,
        })
    }

    /// Regular, non-hidden files in the sources directory, sorted by name.
    pub async fn discover_sources(&self) -> AppResult<Vec<PathBuf>> {
        let mut names: Vec<String> = self
            .artifacts
            .file_names(&self.settings.sources_dir)
            .await?
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| self.settings.sources_dir.join(name))
            .collect())
    }

    /// Run one document end to end; never fails the batch.
    pub async fn process_document(&self, source: &Path) -> DocumentOutcome {
        match self.try_process_document(source).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(source = %source.display(), error = %e, "Document failed");
                DocumentOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_process_document(&self, source: &Path) -> AppResult<DocumentOutcome> {
        let Some(extractor) = self.extractors.for_path(source) else {
            let extension = source
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            tracing::error!("Unsupported file format: {}", extension);
            return Ok(DocumentOutcome::Skipped {
                reason: format!("unsupported file format '{}'", extension),
            });
        };

        let extracted = match extractor.extract(source).await {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::error!(source = %source.display(), error = %e, "Text extraction failed");
                return Ok(DocumentOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
        };

        let document = Document::new(
            source,
            &extracted.text,
            self.settings.chunk_max_chars,
            extracted.metadata,
        );
        if document.is_empty() {
            tracing::warn!(document = %document.name, "No text extracted, skipping");
            return Ok(DocumentOutcome::Skipped {
                reason: "no text to synthesize".to_string(),
            });
        }

        if let Some(metadata) = &document.metadata {
            tracing::info!(
                document = %document.name,
                title = metadata.title.as_deref().unwrap_or(""),
                author = metadata.author.as_deref().unwrap_or(""),
                cover_bytes = metadata.cover.as_ref().map(|c| c.len()).unwrap_or(0),
                "Document metadata"
            );
        }

        let layout = DocumentLayout::new(
            &document.name,
            &self.settings.downloads_dir,
            &self.settings.outputs_dir,
        );

        let state = self.artifacts.scan(&document, &layout).await?;
        let missing = state.missing();
        tracing::info!(
            document = %document.name,
            total = state.total(),
            present = state.present_count(),
            missing = missing.len(),
            "Job state"
        );

        if !missing.is_empty() {
            let report = self.synthesis.dispatch(&document, &layout, &missing).await;
            if !report.is_clean() {
                tracing::warn!(
                    document = %document.name,
                    synthesized = report.synthesized.len(),
                    failed = report.failed.len(),
                    "Some chunks failed and will be retried on the next run"
                );
            }
        }

        // Barrier: merge only once every artifact is on disk.
        let state = self.artifacts.scan(&document, &layout).await?;
        if !state.is_complete() {
            let missing = state.missing().len();
            tracing::warn!(
                document = %document.name,
                missing,
                total = state.total(),
                "Document incomplete, leaving it for the next run"
            );
            return Ok(DocumentOutcome::Incomplete {
                missing,
                total: state.total(),
            });
        }

        let segments = self
            .merge
            .merge(&document, &layout, self.settings.max_segment_ms)
            .await?;
        let finalized = self.finalize.finalize(&document, &layout, &segments).await?;

        self.stats.record_segments(finalized.segments.len());
        tracing::info!(
            document = %document.name,
            segments = finalized.segments.len(),
            "Document completed"
        );

        Ok(DocumentOutcome::Completed {
            segments: finalized.segments.len(),
        })
    }
}
