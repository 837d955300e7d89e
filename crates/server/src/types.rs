use paperbrief_scholar::PaperRecord;
use serde::{de, Deserialize, Deserializer, Serialize};

pub const DEFAULT_SEARCH_RESULTS: usize = 5;
pub const DEFAULT_SUMMARIZE_RESULTS: usize = 3;
pub const MAX_RESULTS: usize = 10;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Pasted-text summarization request
#[derive(Debug, Deserialize)]
pub struct SummarizationRequest {
    pub text: String,

    /// Hosted model when true, local model otherwise
    #[serde(default)]
    pub use_gpt: bool,
}

/// Summary response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Query for `/search/arxiv/`
#[derive(Debug, Deserialize)]
pub struct ArxivSearchQuery {
    pub query: String,

    #[serde(default = "default_search_results")]
    pub num_results: usize,
}

/// Query for `/search-and-summarize/`
#[derive(Debug, Deserialize)]
pub struct SearchAndSummarizeQuery {
    pub source: String,
    pub query: String,

    #[serde(default = "default_summarize_results")]
    pub num_results: usize,

    #[serde(default, deserialize_with = "deserialize_form_bool")]
    pub use_gpt: bool,
}

/// Paper list response
#[derive(Debug, Serialize, Deserialize)]
pub struct PapersResponse {
    pub papers: Vec<PaperRecord>,
}

fn default_search_results() -> usize {
    DEFAULT_SEARCH_RESULTS
}

fn default_summarize_results() -> usize {
    DEFAULT_SUMMARIZE_RESULTS
}

/// Parse a multipart form boolean the way HTML forms send them
pub fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" | "" => Some(false),
        _ => None,
    }
}

/// Query-string boolean accepting the same spellings as the upload form
fn deserialize_form_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_form_bool(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid boolean for use_gpt: {}", value)))
}
