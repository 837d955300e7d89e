use serde::{Deserialize, Serialize};

/// Returned in place of text when nothing could be extracted
pub const NO_TEXT_SENTINEL: &str = "Error: No text found in PDF.";

/// Prefix of the sentinel returned when OCR itself fails
pub const EXTRACTION_ERROR_PREFIX: &str = "Error extracting text:";

/// Where the text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// Selectable text embedded in the PDF
    TextLayer,
    /// Optical character recognition of rendered pages
    Ocr,
}

/// Text of a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number
    pub page_number: usize,

    /// Extracted text (may be empty)
    pub text: String,
}

impl PageText {
    /// Create a new page
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }

    /// Whether the page carries any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Structured extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Text layer or OCR
    pub source: ExtractionSource,

    /// Per-page text in page order
    pub pages: Vec<PageText>,
}

impl Extraction {
    /// Non-blank pages, each followed by a newline
    pub fn text(&self) -> String {
        let mut out = String::new();
        for page in self.pages.iter().filter(|p| !p.is_blank()) {
            out.push_str(&page.text);
            out.push('\n');
        }
        out
    }

    /// Whether any page produced text
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.is_blank())
    }
}
