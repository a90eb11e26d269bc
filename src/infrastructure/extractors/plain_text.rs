use async_trait::async_trait;
use std::path::Path;

use super::{ExtractedText, ExtractionError, TextExtractor};

/// UTF-8 text files, read as-is.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        tracing::info!(path = %path.display(), "Reading text file");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractionError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let text = String::from_utf8(bytes).map_err(|e| ExtractionError::Format {
            format: "text",
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(ExtractedText {
            text,
            metadata: None,
        })
    }
}
