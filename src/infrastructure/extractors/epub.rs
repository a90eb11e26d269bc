use async_trait::async_trait;
use epub::doc::EpubDoc;
use html2text::from_read;
use std::path::Path;

use super::{ExtractedText, ExtractionError, TextExtractor};
use crate::domain::document::DocumentMetadata;

const TEXT_WIDTH: usize = 80;

/// EPUB containers: spine documents in reading order, rendered from HTML to text.
pub struct EpubExtractor;

impl EpubExtractor {
    fn extract_blocking(path: &Path) -> Result<ExtractedText, ExtractionError> {
        let mut doc = EpubDoc::new(path).map_err(|e| ExtractionError::Format {
            format: "EPUB",
            path: path.to_path_buf(),
            message: format!("{:?}", e),
        })?;

        let spine = doc.spine.clone();
        let mut sections = Vec::with_capacity(spine.len());
        for id in &spine {
            match doc.get_resource_str(id) {
                Some((html, _mime)) => {
                    let text = from_read(html.as_bytes(), TEXT_WIDTH);
                    if !text.trim().is_empty() {
                        sections.push(text);
                    }
                }
                None => tracing::warn!(
                    path = %path.display(),
                    spine_item = %id,
                    "EPUB spine item could not be read, skipping"
                ),
            }
        }

        let metadata = DocumentMetadata {
            title: doc.mdata("title"),
            author: doc.mdata("creator"),
            cover: doc.get_cover().map(|(bytes, _mime)| bytes),
        };

        Ok(ExtractedText {
            text: sections.join("\n"),
            metadata: Some(metadata),
        })
    }
}

#[async_trait]
impl TextExtractor for EpubExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["epub"]
    }

    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        tracing::info!(path = %path.display(), "Reading ePub file");

        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&path))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}
