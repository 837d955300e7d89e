//! PaperBrief LLM Integration
//!
//! Token-window chunking, hosted and local summarization backends, and the
//! router that picks between them.

mod chunking;
mod client;
mod llm_trait;
mod local;
mod openai;
mod prompts;
mod summarize;
mod tokenizer;
mod types;

pub use chunking::{split, split_text_into_chunks, Chunks, TextChunk, SAFETY_MARGIN};
pub use client::OllamaClient;
pub use llm_trait::{ChatBackend, LocalSummarizer};
pub use local::OllamaSummarizer;
pub use openai::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, OpenAiClient,
    OpenAiClientConfig, UsageMetrics,
};
pub use prompts::{chunk_prompt, paper_prompt, PAPER_PROMPT_PREFIX};
pub use summarize::{RouterSettings, SummaryRouter};
pub use tokenizer::{HfTokenCounter, TokenCounter};
pub use types::{
    short_input_message, Backend, ChunkOutcome, GenerateOptions, GenerateRequest,
    GenerateResponse, LocalSummaryError, LocalSummaryRequest, SummaryOutcome,
};
