//! Prompt templates for summarization

/// Instruction prefix for the hosted backend
pub const PAPER_PROMPT_PREFIX: &str = "Summarize this research paper:";

/// Prompt for whole-document summarization on the hosted backend
pub fn paper_prompt(text: &str) -> String {
    format!("{}\n{}", PAPER_PROMPT_PREFIX, text)
}

/// Prompt for one chunk on the local backend
pub fn chunk_prompt(chunk: &str, min_length: u32, max_length: u32) -> String {
    format!(
        "You are an abstractive summarizer for research papers. Write a single-paragraph summary \
         of the passage below in roughly {} to {} tokens. Use only facts stated in the passage. \
         Output the summary text only.\n\nPassage:\n{}\n\nSummary:",
        min_length, max_length, chunk
    )
}
