use async_trait::async_trait;
use std::path::Path;

use super::{ExtractedText, ExtractionError, TextExtractor};

/// PDF text layer via `pdf-extract`.
pub struct PdfExtractor;

impl PdfExtractor {
    fn extract_blocking(path: &Path) -> Result<ExtractedText, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text =
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractionError::Format {
                format: "PDF",
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(ExtractedText {
            text,
            metadata: None,
        })
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        tracing::info!(path = %path.display(), "Reading PDF file");

        // PDF parsing is CPU bound
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&path))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}
