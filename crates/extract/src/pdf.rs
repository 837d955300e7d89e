//! Selectable-text extraction

use paperbrief_common::{PaperBriefError, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::types::PageText;

/// Check if file extension is `.pdf` (case-insensitive)
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Extract the text layer page by page
///
/// Pages without selectable text are kept (empty) so callers can report them.
pub async fn extract_text_layer(path: &Path) -> Result<Vec<PageText>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        PaperBriefError::extraction(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| PaperBriefError::extraction(format!("PDF parser aborted: {}", e)))?
        .map_err(|e| PaperBriefError::extraction(format!("PDF parse failed: {}", e)))?;

    let pages = split_pages(&text);
    for page in pages.iter().filter(|p| p.is_blank()) {
        warn!("Page {}: No selectable text found.", page.page_number);
    }
    debug!("Text layer: {} pages, {} chars", pages.len(), text.len());

    Ok(pages)
}

/// pdf-extract separates pages with form feeds
pub fn split_pages(text: &str) -> Vec<PageText> {
    let mut pages: Vec<PageText> = text
        .split('\x0C')
        .enumerate()
        .map(|(i, page)| PageText::new(i + 1, page.trim()))
        .collect();

    // A trailing form feed closes the last page rather than opening a new one
    if pages.len() > 1 && pages.last().map(|p| p.is_blank()).unwrap_or(false) {
        pages.pop();
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("paper.pdf")));
        assert!(is_pdf(Path::new("PAPER.PDF")));
        assert!(!is_pdf(Path::new("paper.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_split_pages() {
        let pages = split_pages("Abstract\x0C\x0CMethods\n\x0C");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], PageText::new(1, "Abstract"));
        assert!(pages[1].is_blank());
        assert_eq!(pages[2], PageText::new(3, "Methods"));
    }

    #[test]
    fn test_split_single_page() {
        let pages = split_pages("  one page only  ");
        assert_eq!(pages, vec![PageText::new(1, "one page only")]);
    }

    #[tokio::test]
    async fn test_missing_file_is_extraction_error() {
        let err = extract_text_layer(Path::new("./missing.pdf")).await.unwrap_err();
        assert!(matches!(err, PaperBriefError::Extraction(_)));
    }
}
