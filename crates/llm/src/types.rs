use serde::{Deserialize, Serialize};
use std::fmt;

use paperbrief_common::PaperBriefError;

/// Ollama generate request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model name (e.g., "llama3.2", "gemma2")
    pub model: String,

    /// Prompt text
    pub prompt: String,

    /// Disable streaming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Generation options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

/// Generation options
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerateOptions {
    /// Temperature (0.0 - 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Top-k sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Fixed RNG seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
}

impl GenerateOptions {
    /// Greedy decoding: no sampling, reproducible output
    pub fn deterministic(num_predict: i32) -> Self {
        Self {
            temperature: Some(0.0),
            top_k: Some(1),
            top_p: Some(1.0),
            seed: Some(0),
            num_predict: Some(num_predict),
        }
    }
}

/// Ollama generate response
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Model name
    pub model: String,

    /// Generated text
    pub response: String,

    /// Whether generation is complete
    pub done: bool,
}

/// Which summarization backend handles a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Hosted chat-completion model, whole document in one call
    Hosted,
    /// Local abstractive model, one call per chunk
    Local,
}

impl Backend {
    /// Map the API's `use_gpt` flag
    pub fn from_use_llm(use_llm: bool) -> Self {
        if use_llm {
            Self::Hosted
        } else {
            Self::Local
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hosted => write!(f, "hosted"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Request to the local summarization backend for a single chunk
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSummaryRequest {
    /// Chunk text
    pub text: String,

    /// Upper bound on generated tokens
    pub max_length: u32,

    /// Lower bound on generated tokens
    pub min_length: u32,

    /// Sampling enabled (false = deterministic decoding)
    pub do_sample: bool,
}

/// Failure of the local backend on one chunk
#[derive(Debug, thiserror::Error)]
pub enum LocalSummaryError {
    /// Backend refused the chunk as too short to summarize
    #[error("{0}")]
    InputTooShort(String),

    /// Any other backend failure
    #[error(transparent)]
    Backend(#[from] PaperBriefError),
}

/// Outcome of summarizing one chunk
#[derive(Debug)]
pub enum ChunkOutcome {
    /// Backend produced a summary
    Summarized { index: usize, text: String },

    /// Backend failed; rendered as an inline placeholder
    Failed {
        index: usize,
        error: LocalSummaryError,
    },
}

impl ChunkOutcome {
    /// Chunk position in document order
    pub fn index(&self) -> usize {
        match self {
            Self::Summarized { index, .. } | Self::Failed { index, .. } => *index,
        }
    }

    /// Whether this chunk failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Text joined into the final summary
    pub fn render(&self) -> String {
        match self {
            Self::Summarized { text, .. } => text.clone(),
            Self::Failed {
                error: error @ LocalSummaryError::InputTooShort(_),
                ..
            } => format!("Error: {} - Input text may be too short.", error),
            Self::Failed { error, .. } => format!("Error: {}", error),
        }
    }
}

/// Result of one summarization call
#[derive(Debug)]
pub enum SummaryOutcome {
    /// A summary was produced (possibly with per-chunk placeholders)
    Summarized {
        text: String,
        backend: Backend,
        chunks: Vec<ChunkOutcome>,
    },

    /// Trimmed input was below the minimum length
    InputTooShort { chars: usize },
}

impl SummaryOutcome {
    /// Whether a summary was produced
    pub fn is_summarized(&self) -> bool {
        matches!(self, Self::Summarized { .. })
    }

    /// Number of chunks that fell back to a placeholder
    pub fn failed_chunks(&self) -> usize {
        match self {
            Self::Summarized { chunks, .. } => chunks.iter().filter(|c| c.is_failed()).count(),
            Self::InputTooShort { .. } => 0,
        }
    }

    /// String returned by the HTTP API
    ///
    /// Short input is reported in-band, as the summary text itself.
    pub fn render(&self) -> String {
        match self {
            Self::Summarized { text, .. } => text.clone(),
            Self::InputTooShort { chars } => short_input_message(*chars),
        }
    }

    /// Consume into the API string
    pub fn into_text(self) -> String {
        match self {
            Self::Summarized { text, .. } => text,
            Self::InputTooShort { chars } => short_input_message(chars),
        }
    }
}

/// Message returned when the input is below the minimum length
pub fn short_input_message(chars: usize) -> String {
    format!(
        "Error: Input text is too short ({} chars). Try a longer document.",
        chars
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_options_serialize() {
        let options = GenerateOptions::deterministic(150);
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["top_k"], 1);
        assert_eq!(value["num_predict"], 150);
    }

    #[test]
    fn test_placeholder_rendering() {
        let short = ChunkOutcome::Failed {
            index: 0,
            error: LocalSummaryError::InputTooShort("index out of range in self".to_string()),
        };
        assert_eq!(
            short.render(),
            "Error: index out of range in self - Input text may be too short."
        );

        let other = ChunkOutcome::Failed {
            index: 1,
            error: LocalSummaryError::Backend(PaperBriefError::network("connection refused")),
        };
        assert_eq!(other.render(), "Error: Network error: connection refused");
    }

    #[test]
    fn test_short_input_message() {
        let outcome = SummaryOutcome::InputTooShort { chars: 0 };
        assert_eq!(
            outcome.render(),
            "Error: Input text is too short (0 chars). Try a longer document."
        );
        assert!(!outcome.is_summarized());
    }

    #[test]
    fn test_backend_from_flag() {
        assert_eq!(Backend::from_use_llm(true), Backend::Hosted);
        assert_eq!(Backend::from_use_llm(false), Backend::Local);
    }
}
