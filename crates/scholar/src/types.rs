use serde::{Deserialize, Serialize};

/// A paper returned by an academic search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,

    /// Author names joined with ", "
    pub authors: String,

    /// Publication year
    pub year: i32,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Direct link to the PDF
    pub pdf_link: Option<String>,

    /// Entry id (abs URL) of the paper
    pub arxiv_id: String,

    /// Filled in by search-and-summarize
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<String>,
}

impl PaperRecord {
    /// Text handed to the summarizer: title, newline, abstract (or nothing)
    pub fn summary_input(&self) -> String {
        format!(
            "{}\n{}",
            self.title,
            self.abstract_text.as_deref().unwrap_or("")
        )
    }
}

/// Collapse runs of whitespace (Atom fields are hard-wrapped)
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PaperRecord {
        PaperRecord {
            title: "Sparse Attention".to_string(),
            authors: "Ada Lovelace, Alan Turing".to_string(),
            year: 2024,
            abstract_text: None,
            pdf_link: None,
            arxiv_id: "http://arxiv.org/abs/2401.00001v1".to_string(),
            summary: None,
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Deep\n  learning\tfor\n\nPDFs "), "Deep learning for PDFs");
    }

    #[test]
    fn test_summary_input_without_abstract() {
        assert_eq!(record().summary_input(), "Sparse Attention\n");
    }

    #[test]
    fn test_serialization_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert!(value.get("abstract").is_some());
        assert!(value.get("summary").is_none());

        let mut with_summary = record();
        with_summary.summary = Some("Short.".to_string());
        let value = serde_json::to_value(with_summary).unwrap();
        assert_eq!(value["summary"], "Short.");
    }
}
