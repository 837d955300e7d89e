use async_trait::async_trait;
use paperbrief_common::Result;

use crate::openai::{ChatCompletionRequest, ChatCompletionResponse};
use crate::types::{LocalSummaryError, LocalSummaryRequest};

/// Hosted chat-completion backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run a single chat completion
    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}

/// Local abstractive summarization backend, called once per chunk
#[async_trait]
pub trait LocalSummarizer: Send + Sync {
    /// Summarize one chunk within the requested length bounds
    async fn summarize(&self, request: LocalSummaryRequest) -> std::result::Result<String, LocalSummaryError>;
}
