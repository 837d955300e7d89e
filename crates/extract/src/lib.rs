//! PaperBrief PDF Extraction
//!
//! Text layer extraction via pdf-extract with a pdftoppm + tesseract OCR fallback

pub mod extractor;
pub mod ocr;
pub mod pdf;
pub mod types;

// Re-export main types
pub use extractor::{is_sentinel, PdfExtractor};
pub use ocr::OcrEngine;
pub use pdf::is_pdf;
pub use types::{Extraction, ExtractionSource, PageText, EXTRACTION_ERROR_PREFIX, NO_TEXT_SENTINEL};
