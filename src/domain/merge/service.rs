use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use super::error::MergeError;
use super::packer::GreedyPacker;
use crate::domain::document::{Document, DocumentLayout};
use crate::infrastructure::audio::{AudioClip, AudioCodec};
use crate::infrastructure::repositories::ArtifactRepository;

/// A merged segment written under its provisional name.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSegment {
    pub index: usize,
    pub path: PathBuf,
    pub chunks: Range<usize>,
    pub duration_ms: u64,
}

/// Concatenates a document's chunk artifacts into duration-bounded segments.
pub struct MergeService {
    codec: Arc<dyn AudioCodec>,
    artifacts: ArtifactRepository,
}

impl MergeService {
    pub fn new(codec: Arc<dyn AudioCodec>, artifacts: ArtifactRepository) -> Self {
        Self { codec, artifacts }
    }

    /// Merge every chunk artifact of `document`, in index order.
    ///
    /// Segment files from an earlier attempt are removed first. Segments are written
    /// under provisional names; only one segment's audio is held in memory at a time.
    pub async fn merge(
        &self,
        document: &Document,
        layout: &DocumentLayout,
        max_duration_ms: u64,
    ) -> Result<Vec<MergedSegment>, MergeError> {
        if document.is_empty() {
            return Err(MergeError::NothingToMerge);
        }

        self.remove_stale_segments(document, layout).await?;

        let mut packer: GreedyPacker<(usize, AudioClip)> = GreedyPacker::new(max_duration_ms);
        let mut segments = Vec::new();

        for chunk in &document.chunks {
            let path = layout.chunk_path(chunk);
            let bytes = self
                .artifacts
                .read(&path)
                .await
                .map_err(|source| MergeError::Io {
                    path: path.clone(),
                    source,
                })?;
            let clip = self
                .codec
                .decode(bytes)
                .map_err(|source| MergeError::Audio { path, source })?;

            tracing::debug!(
                document = %document.name,
                chunk = chunk.index + 1,
                duration_ms = clip.duration_ms,
                "Processing file {}",
                chunk.file_name
            );

            let duration_ms = clip.duration_ms;
            if let Some((group, total_ms)) = packer.push((chunk.index, clip), duration_ms) {
                let segment = self.write_segment(layout, segments.len(), group, total_ms).await?;
                segments.push(segment);
            }
        }

        if let Some((group, total_ms)) = packer.finish() {
            let segment = self.write_segment(layout, segments.len(), group, total_ms).await?;
            segments.push(segment);
        }

        tracing::info!(
            document = %document.name,
            chunks = document.total_chunks(),
            segments = segments.len(),
            max_duration_ms,
            "Merged chunk artifacts"
        );

        Ok(segments)
    }

    async fn write_segment(
        &self,
        layout: &DocumentLayout,
        index: usize,
        group: Vec<(usize, AudioClip)>,
        duration_ms: u64,
    ) -> Result<MergedSegment, MergeError> {
        let first = group.first().map(|(i, _)| *i).unwrap_or_default();
        let last = group.last().map(|(i, _)| *i).unwrap_or_default();
        let clips: Vec<AudioClip> = group.into_iter().map(|(_, clip)| clip).collect();

        let path = layout.provisional_segment_path(index);
        let bytes = self
            .codec
            .encode(&clips)
            .map_err(|source| MergeError::Audio {
                path: path.clone(),
                source,
            })?;
        self.artifacts
            .write_atomic(&path, &bytes)
            .await
            .map_err(|source| MergeError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            segment = index + 1,
            duration_ms,
            chunks = clips.len(),
            "Merged file created: {}",
            path.display()
        );

        Ok(MergedSegment {
            index,
            path,
            chunks: first..last + 1,
            duration_ms,
        })
    }

    async fn remove_stale_segments(
        &self,
        document: &Document,
        layout: &DocumentLayout,
    ) -> Result<(), MergeError> {
        let stale = self
            .artifacts
            .segment_files(&layout.output_dir, &document.name)
            .await
            .map_err(|source| MergeError::Io {
                path: layout.output_dir.clone(),
                source,
            })?;

        self.artifacts
            .sweep_temp_files(&layout.output_dir)
            .await
            .map_err(|source| MergeError::Io {
                path: layout.output_dir.clone(),
                source,
            })?;

        for path in stale {
            tracing::debug!(path = %path.display(), "Removing segment from an earlier attempt");
            self.artifacts
                .remove_file(&path)
                .await
                .map_err(|source| MergeError::Io { path, source })?;
        }
        Ok(())
    }
}
