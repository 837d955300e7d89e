//! PDF text extraction with OCR fallback

use paperbrief_common::{AppConfig, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::ocr::OcrEngine;
use crate::pdf::extract_text_layer;
use crate::types::{Extraction, ExtractionSource, EXTRACTION_ERROR_PREFIX, NO_TEXT_SENTINEL};

/// Extracts text from PDF files
///
/// The embedded text layer is tried first. Only when no page carries
/// selectable text are the pages rendered and passed through OCR.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    ocr: OcrEngine,
}

impl PdfExtractor {
    pub fn new(ocr: OcrEngine) -> Self {
        Self { ocr }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(OcrEngine::from_config(config))
    }

    /// Structured extraction
    ///
    /// A PDF the parser cannot read is treated like a scanned one and goes
    /// to OCR as well.
    pub async fn try_extract(&self, path: &Path) -> Result<Extraction> {
        match extract_text_layer(path).await {
            Ok(pages) if pages.iter().any(|p| !p.is_blank()) => {
                info!("Extracted text layer from {} ({} pages)", path.display(), pages.len());
                return Ok(Extraction {
                    source: ExtractionSource::TextLayer,
                    pages,
                });
            }
            Ok(_) => {
                info!("No text layer in {}, falling back to OCR", path.display());
            }
            Err(e) => {
                warn!("Text layer extraction failed for {}: {}", path.display(), e);
            }
        }

        let pages = self.ocr.ocr_pdf(path).await?;
        Ok(Extraction {
            source: ExtractionSource::Ocr,
            pages,
        })
    }

    /// Extract text as a single string
    ///
    /// Never fails: OCR errors become `"Error extracting text: ..."` and a
    /// document with no text becomes `"Error: No text found in PDF."`.
    pub async fn extract_text(&self, path: &Path) -> String {
        match self.try_extract(path).await {
            Ok(extraction) => render(&extraction),
            Err(e) => {
                warn!("Extraction failed for {}: {}", path.display(), e);
                format!("{} {}", EXTRACTION_ERROR_PREFIX, e)
            }
        }
    }
}

/// Trimmed text, or the no-text sentinel
pub fn render(extraction: &Extraction) -> String {
    let text = extraction.text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        NO_TEXT_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether `text` is one of the extraction sentinels rather than content
pub fn is_sentinel(text: &str) -> bool {
    text == NO_TEXT_SENTINEL || text.starts_with(EXTRACTION_ERROR_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageText;

    fn extractor() -> PdfExtractor {
        PdfExtractor::new(OcrEngine::new(
            "paperbrief-no-such-pdftoppm",
            "paperbrief-no-such-tesseract",
            "eng",
        ))
    }

    #[test]
    fn test_render_trims() {
        let extraction = Extraction {
            source: ExtractionSource::TextLayer,
            pages: vec![PageText::new(1, "Abstract"), PageText::new(2, "Body")],
        };
        assert_eq!(render(&extraction), "Abstract\nBody");
    }

    #[test]
    fn test_render_no_text() {
        let extraction = Extraction {
            source: ExtractionSource::Ocr,
            pages: vec![],
        };
        assert_eq!(render(&extraction), NO_TEXT_SENTINEL);
        assert!(is_sentinel(&render(&extraction)));
    }

    #[test]
    fn test_is_sentinel() {
        assert!(is_sentinel("Error extracting text: tesseract failed"));
        assert!(!is_sentinel("Attention is all you need"));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_yields_error_sentinel() {
        let dir = std::env::temp_dir().join(format!("paperbrief-extract-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("broken.pdf");
        tokio::fs::write(&path, b"not a pdf").await.unwrap();

        let text = extractor().extract_text(&path).await;
        assert!(text.starts_with(EXTRACTION_ERROR_PREFIX));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
