use std::path::{Path, PathBuf};

use super::chunker::split_text;
use super::naming::{part_file_name, provisional_segment_name};

/// Descriptive metadata some source formats carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub file_name: String,
}

impl Chunk {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A source document and the chunks derived from its text.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub source_path: PathBuf,
    pub chunks: Vec<Chunk>,
    pub metadata: Option<DocumentMetadata>,
}

impl Document {
    /// Chunk `text` and name every chunk against the final chunk count.
    pub fn new(
        source_path: &Path,
        text: &str,
        max_chars: usize,
        metadata: Option<DocumentMetadata>,
    ) -> Self {
        let name = document_name(source_path);
        let pieces = split_text(text, max_chars);
        let total = pieces.len();
        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk {
                index,
                file_name: part_file_name(&name, index, total),
                text,
            })
            .collect();

        Self {
            name,
            source_path: source_path.to_path_buf(),
            chunks,
            metadata,
        }
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn source_file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Stable document name: the source file name without its extension.
pub fn document_name(source_path: &Path) -> String {
    source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where a document's chunk artifacts and merged segments live on disk.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub document: String,
    pub chunk_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl DocumentLayout {
    pub fn new(document: &str, downloads_root: &Path, outputs_root: &Path) -> Self {
        Self {
            document: document.to_string(),
            chunk_dir: downloads_root.join(document),
            output_dir: outputs_root.join(document),
        }
    }

    pub fn chunk_path(&self, chunk: &Chunk) -> PathBuf {
        self.chunk_dir.join(&chunk.file_name)
    }

    pub fn provisional_segment_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(provisional_segment_name(&self.document, index))
    }

    pub fn segment_path(&self, index: usize, total: usize) -> PathBuf {
        self.output_dir
            .join(part_file_name(&self.document, index, total))
    }
}
