use regex::Regex;
use std::collections::HashSet;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::document::{Document, DocumentLayout, JobState};

const TEMP_SUFFIX: &str = ".tmp";

/// Filesystem access for chunk artifacts, merged segments and archived sources.
///
/// Every write goes to a hidden temp file in the target directory and is renamed into
/// place, so a file at an expected path is always complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactRepository;

impl ArtifactRepository {
    pub fn new() -> Self {
        Self
    }

    /// Sample the chunk directory once and report which artifacts exist.
    ///
    /// Leftover temp files from interrupted writes are removed on the way.
    pub async fn scan(&self, document: &Document, layout: &DocumentLayout) -> io::Result<JobState> {
        let names = self.file_names(&layout.chunk_dir).await?;
        self.remove_temp_files(&layout.chunk_dir, &names).await;

        Ok(JobState::from_file_names(document, &names))
    }

    /// Remove temp files that interrupted writes left in `dir`; returns how many went.
    pub async fn sweep_temp_files(&self, dir: &Path) -> io::Result<usize> {
        let names = self.file_names(dir).await?;
        Ok(self.remove_temp_files(dir, &names).await)
    }

    async fn remove_temp_files(&self, dir: &Path, names: &HashSet<String>) -> usize {
        let mut removed = 0;
        for name in names.iter().filter(|n| n.ends_with(TEMP_SUFFIX)) {
            let path = dir.join(name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Removed stale temp file");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Could not remove stale temp file")
                }
            }
        }
        removed
    }

    /// Names of the regular files directly inside `dir`; a missing directory is empty.
    pub async fn file_names(&self, dir: &Path) -> io::Result<HashSet<String>> {
        let mut names = HashSet::new();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Write `bytes` to `path` so that `path` is either absent or complete.
    pub async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "path has no parent"))?;
        tokio::fs::create_dir_all(dir).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = dir.join(format!(".{}.{}{}", file_name, Uuid::new_v4(), TEMP_SUFFIX));

        let result = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            tokio::fs::rename(&temp_path, path).await
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&temp_path).await;
        }
        result
    }

    pub async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    pub async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::rename(from, to).await
    }

    /// Move a file, falling back to copy and delete across filesystems.
    pub async fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        if let Some(dir) = to.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        match tokio::fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                tracing::debug!(error = %rename_err, "Rename failed, copying instead");
                tokio::fs::copy(from, to).await?;
                tokio::fs::remove_file(from).await
            }
        }
    }

    pub async fn remove_dir_all(&self, dir: &Path) -> io::Result<()> {
        match tokio::fs::remove_dir_all(dir).await {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Provisional and final segment files a previous attempt left for `document`.
    pub async fn segment_files(&self, output_dir: &Path, document: &str) -> io::Result<Vec<PathBuf>> {
        let pattern = Regex::new(&format!(
            r"^{}_(merged_part\d+|\d+_of_\d+)\.mp3$",
            regex::escape(document)
        ))
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;

        let mut files: Vec<PathBuf> = self
            .file_names(output_dir)
            .await?
            .into_iter()
            .filter(|name| pattern.is_match(name))
            .map(|name| output_dir.join(name))
            .collect();
        files.sort();
        Ok(files)
    }

    pub async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}
