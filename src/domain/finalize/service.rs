use std::path::{Path, PathBuf};

use super::error::FinalizeError;
use crate::domain::document::{Document, DocumentLayout};
use crate::domain::merge::MergedSegment;
use crate::infrastructure::repositories::ArtifactRepository;

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedDocument {
    pub segments: Vec<PathBuf>,
    pub archived_to: PathBuf,
    pub intermediate_removed: bool,
}

/// Labels merged segments with the final count and retires the source document.
///
/// Final names are only built once the segment count is known. The source is archived
/// and chunk artifacts are removed only after every rename succeeded; on any earlier
/// failure the chunk artifacts and remaining provisional segments stay on disk.
pub struct FinalizeService {
    artifacts: ArtifactRepository,
    done_dir: PathBuf,
    delete_intermediate: bool,
}

impl FinalizeService {
    pub fn new(artifacts: ArtifactRepository, done_dir: &Path, delete_intermediate: bool) -> Self {
        Self {
            artifacts,
            done_dir: done_dir.to_path_buf(),
            delete_intermediate,
        }
    }

    pub async fn finalize(
        &self,
        document: &Document,
        layout: &DocumentLayout,
        segments: &[MergedSegment],
    ) -> Result<FinalizedDocument, FinalizeError> {
        let total = segments.len();

        if let Some(missing) = segments.iter().find(|s| !s.path.exists()) {
            return Err(FinalizeError::SegmentMissing {
                path: missing.path.clone(),
            });
        }

        let mut finals = Vec::with_capacity(total);
        for segment in segments {
            let target = layout.segment_path(segment.index, total);
            self.artifacts
                .rename(&segment.path, &target)
                .await
                .map_err(|source| FinalizeError::Rename {
                    from: segment.path.clone(),
                    to: target.clone(),
                    source,
                })?;
            tracing::debug!(from = %segment.path.display(), to = %target.display(), "Renamed segment");
            finals.push(target);
        }

        let archived_to = self.done_dir.join(document.source_file_name());
        self.artifacts
            .move_file(&document.source_path, &archived_to)
            .await
            .map_err(|source| FinalizeError::Archive {
                from: document.source_path.clone(),
                to: archived_to.clone(),
                source,
            })?;
        tracing::info!(
            document = %document.name,
            archived_to = %archived_to.display(),
            "Source archived"
        );

        let intermediate_removed = if self.delete_intermediate {
            match self.artifacts.remove_dir_all(&layout.chunk_dir).await {
                Ok(()) => {
                    tracing::info!(
                        document = %document.name,
                        dir = %layout.chunk_dir.display(),
                        "Removed intermediate chunk artifacts"
                    );
                    true
                }
                Err(e) => {
                    // The document is already complete; leftovers only cost disk space.
                    tracing::warn!(
                        document = %document.name,
                        dir = %layout.chunk_dir.display(),
                        error = %e,
                        "Could not remove intermediate chunk artifacts"
                    );
                    false
                }
            }
        } else {
            false
        };

        Ok(FinalizedDocument {
            segments: finals,
            archived_to,
            intermediate_removed,
        })
    }
}
