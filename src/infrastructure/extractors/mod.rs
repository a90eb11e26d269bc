pub mod epub;
pub mod pdf;
pub mod plain_text;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::document::DocumentMetadata;

pub use self::epub::EpubExtractor;
pub use self::pdf::PdfExtractor;
pub use self::plain_text::PlainTextExtractor;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{format} parsing failed for {path}: {message}")]
    Format {
        format: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Raw text pulled out of a source document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    pub text: String,
    pub metadata: Option<DocumentMetadata>,
}

/// One source format.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Lowercase file extensions this extractor handles.
    fn supported_extensions(&self) -> &[&str];

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError>;
}

/// Picks the extractor for a source file by extension.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new(extractors: Vec<Arc<dyn TextExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn TextExtractor>> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        self.extractors
            .iter()
            .find(|e| e.supported_extensions().contains(&extension.as_str()))
            .cloned()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(PlainTextExtractor),
            Arc::new(PdfExtractor),
            Arc::new(EpubExtractor),
        ])
    }
}
