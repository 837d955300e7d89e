use paperbrief_common::{PaperBriefError, Result};
use std::str::SplitWhitespace;
use tracing::warn;

use crate::tokenizer::TokenCounter;

/// Tokens kept free below the model window
pub const SAFETY_MARGIN: usize = 10;

/// Text chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position in document order
    pub index: usize,

    /// Chunk text (words joined by single spaces)
    pub text: String,

    /// Token count of `text` under the target tokenizer
    pub token_count: usize,

    /// Single word that alone exceeds the budget
    pub oversized: bool,
}

/// Lazy, greedy word-run chunker
///
/// Words are appended one at a time; once the candidate tokenizes past
/// `max_tokens - SAFETY_MARGIN` the words accumulated before the last one
/// are emitted and the last word starts the next candidate.
pub struct Chunks<'a> {
    words: SplitWhitespace<'a>,
    counter: &'a dyn TokenCounter,
    budget: usize,
    candidate: String,
    candidate_words: usize,
    // None until measured on its own (a word carried over from an overflow)
    candidate_tokens: Option<usize>,
    next_index: usize,
    done: bool,
}

/// Split `text` into chunks that fit `max_tokens` under `counter`
pub fn split<'a>(
    text: &'a str,
    max_tokens: usize,
    counter: &'a dyn TokenCounter,
) -> Result<Chunks<'a>> {
    if max_tokens <= SAFETY_MARGIN {
        return Err(PaperBriefError::invalid_input(format!(
            "max_tokens must exceed the safety margin of {} (got {})",
            SAFETY_MARGIN, max_tokens
        )));
    }

    Ok(Chunks {
        words: text.split_whitespace(),
        counter,
        budget: max_tokens - SAFETY_MARGIN,
        candidate: String::new(),
        candidate_words: 0,
        candidate_tokens: None,
        next_index: 0,
        done: false,
    })
}

/// Split text into chunks that fit within the model's token limit
pub fn split_text_into_chunks(
    text: &str,
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> Result<Vec<TextChunk>> {
    split(text, max_tokens, counter)?.collect()
}

impl<'a> Chunks<'a> {
    /// Token budget per chunk
    pub fn budget(&self) -> usize {
        self.budget
    }

    fn fail(&mut self, err: PaperBriefError) -> Option<Result<TextChunk>> {
        self.done = true;
        Some(Err(err))
    }

    fn emit(&mut self, text: String, known_tokens: Option<usize>) -> Result<TextChunk> {
        let token_count = match known_tokens {
            Some(count) => count,
            None => self.counter.count_tokens(&text)?,
        };
        let oversized = token_count > self.budget;
        if oversized {
            warn!(
                "Chunk {} is a single word of {} tokens, over the {}-token budget",
                self.next_index, token_count, self.budget
            );
        }

        let chunk = TextChunk {
            index: self.next_index,
            text,
            token_count,
            oversized,
        };
        self.next_index += 1;
        Ok(chunk)
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<TextChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let Some(word) = self.words.next() else {
                self.done = true;
                if self.candidate_words == 0 {
                    return None;
                }
                let text = std::mem::take(&mut self.candidate);
                let tokens = self.candidate_tokens.take();
                self.candidate_words = 0;
                return Some(self.emit(text, tokens));
            };

            let previous_len = self.candidate.len();
            if !self.candidate.is_empty() {
                self.candidate.push(' ');
            }
            self.candidate.push_str(word);

            let count = match self.counter.count_tokens(&self.candidate) {
                Ok(count) => count,
                Err(e) => return self.fail(e),
            };

            if count <= self.budget {
                self.candidate_words += 1;
                self.candidate_tokens = Some(count);
                continue;
            }

            if self.candidate_words == 0 {
                // Lone word over budget: kept whole, flagged when emitted
                self.candidate_words = 1;
                self.candidate_tokens = Some(count);
                continue;
            }

            self.candidate.truncate(previous_len);
            let finished = std::mem::replace(&mut self.candidate, word.to_string());
            let finished_tokens = self.candidate_tokens.take();
            self.candidate_words = 1;

            return match self.emit(finished, finished_tokens) {
                Ok(chunk) => Some(Ok(chunk)),
                Err(e) => self.fail(e),
            };
        }
    }
}
