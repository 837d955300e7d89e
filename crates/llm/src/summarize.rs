use paperbrief_common::{AppConfig, PaperBriefError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chunking::{split_text_into_chunks, TextChunk};
use crate::llm_trait::{ChatBackend, LocalSummarizer};
use crate::openai::{ChatCompletionRequest, ChatMessage, ChatRole};
use crate::prompts::paper_prompt;
use crate::tokenizer::TokenCounter;
use crate::types::{Backend, ChunkOutcome, LocalSummaryRequest, SummaryOutcome};

/// Routing limits
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Minimum trimmed input length in characters
    pub min_text_length: usize,

    /// Token window per chunk on the local path
    pub chunk_max_tokens: usize,

    /// Per-chunk summary bounds on the local path
    pub summary_min_length: u32,
    pub summary_max_length: u32,

    /// Output token cap on the hosted path
    pub llm_max_tokens: u32,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            chunk_max_tokens: 512,
            summary_min_length: 50,
            summary_max_length: 150,
            llm_max_tokens: 1000,
        }
    }
}

impl RouterSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
            chunk_max_tokens: config.chunk_max_tokens,
            summary_min_length: config.summary_min_length,
            summary_max_length: config.summary_max_length,
            llm_max_tokens: config.llm_max_tokens,
        }
    }
}

/// Routes a document to the hosted or local backend
pub struct SummaryRouter {
    hosted: Arc<dyn ChatBackend>,
    local: Arc<dyn LocalSummarizer>,
    tokenizer: Arc<dyn TokenCounter>,
    settings: RouterSettings,
}

impl SummaryRouter {
    /// Create new router
    pub fn new(
        hosted: Arc<dyn ChatBackend>,
        local: Arc<dyn LocalSummarizer>,
        tokenizer: Arc<dyn TokenCounter>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            hosted,
            local,
            tokenizer,
            settings,
        }
    }

    /// Summarize `text` with the chosen backend
    ///
    /// Short input is not an error: it yields `SummaryOutcome::InputTooShort`.
    /// Only a hosted-backend failure (or a tokenizer failure) returns `Err`.
    pub async fn summarize(&self, text: &str, backend: Backend) -> Result<SummaryOutcome> {
        let chars = text.trim().chars().count();
        if chars < self.settings.min_text_length {
            info!(
                "Input too short for summarization: {} chars (minimum {})",
                chars, self.settings.min_text_length
            );
            return Ok(SummaryOutcome::InputTooShort { chars });
        }

        info!(
            "Starting summarization - Backend: {}, Text length: {} chars",
            backend, chars
        );

        match backend {
            Backend::Hosted => self.summarize_hosted(text).await,
            Backend::Local => self.summarize_local(text).await,
        }
    }

    /// Summarize and render the API string
    pub async fn summarize_to_string(&self, text: &str, backend: Backend) -> Result<String> {
        Ok(self.summarize(text, backend).await?.into_text())
    }

    /// Whole document in one chat completion
    async fn summarize_hosted(&self, text: &str) -> Result<SummaryOutcome> {
        let request = ChatCompletionRequest {
            model: None,
            messages: vec![ChatMessage::new(ChatRole::User, paper_prompt(text))],
            max_tokens: Some(self.settings.llm_max_tokens),
        };

        let response = self.hosted.chat_completion(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                "Hosted usage - prompt: {:?}, completion: {:?}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(SummaryOutcome::Summarized {
            text: response.content,
            backend: Backend::Hosted,
            chunks: Vec::new(),
        })
    }

    /// Chunk, summarize each chunk in order, join with single spaces
    async fn summarize_local(&self, text: &str) -> Result<SummaryOutcome> {
        let chunks = self.chunk(text).await?;
        let total = chunks.len();
        info!("Splitting text into {} chunks for summarization", total);

        let mut outcomes = Vec::with_capacity(total);
        for chunk in chunks {
            info!("Summarizing chunk {}/{}...", chunk.index + 1, total);

            let request = LocalSummaryRequest {
                text: chunk.text,
                max_length: self.settings.summary_max_length,
                min_length: self.settings.summary_min_length,
                do_sample: false,
            };

            let outcome = match self.local.summarize(request).await {
                Ok(summary) => ChunkOutcome::Summarized {
                    index: chunk.index,
                    text: summary,
                },
                Err(error) => {
                    warn!("Chunk {}/{} failed: {}", chunk.index + 1, total, error);
                    ChunkOutcome::Failed {
                        index: chunk.index,
                        error,
                    }
                }
            };
            outcomes.push(outcome);
        }

        let text = outcomes
            .iter()
            .map(ChunkOutcome::render)
            .collect::<Vec<_>>()
            .join(" ");

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(
            "Local summarization finished - {} chunks, {} failed, {} chars",
            total,
            failed,
            text.len()
        );

        Ok(SummaryOutcome::Summarized {
            text,
            backend: Backend::Local,
            chunks: outcomes,
        })
    }

    /// Tokenizer-bound chunking runs off the async workers
    async fn chunk(&self, text: &str) -> Result<Vec<TextChunk>> {
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_owned();
        let max_tokens = self.settings.chunk_max_tokens;

        tokio::task::spawn_blocking(move || split_text_into_chunks(&text, max_tokens, &*tokenizer))
            .await
            .map_err(|e| PaperBriefError::internal(format!("Chunking task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::ChatCompletionResponse;
    use crate::types::LocalSummaryError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count_tokens(&self, text: &str) -> Result<usize> {
            Ok(text.split_whitespace().count() + 2)
        }
    }

    /// Records requests; fails with a timeout when `fail` is set
    #[derive(Default)]
    struct StubHosted {
        fail: bool,
        calls: Mutex<Vec<ChatCompletionRequest>>,
    }

    #[async_trait]
    impl ChatBackend for StubHosted {
        async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
            self.calls.lock().unwrap().push(request);
            if self.fail {
                return Err(PaperBriefError::timeout("chat completion after 120s"));
            }
            Ok(ChatCompletionResponse {
                content: "Hosted summary.".to_string(),
                usage: None,
            })
        }
    }

    /// Answers "S<first word>"; chunks starting with FAIL or SHORT fail
    #[derive(Default)]
    struct StubLocal {
        calls: Mutex<Vec<LocalSummaryRequest>>,
    }

    #[async_trait]
    impl LocalSummarizer for StubLocal {
        async fn summarize(&self, request: LocalSummaryRequest) -> std::result::Result<String, LocalSummaryError> {
            self.calls.lock().unwrap().push(request.clone());
            let first = request.text.split_whitespace().next().unwrap_or_default();
            match first {
                "FAIL" => Err(PaperBriefError::llm("model crashed").into()),
                "SHORT" => Err(LocalSummaryError::InputTooShort(
                    "index out of range in self".to_string(),
                )),
                _ => Ok(format!("S{}", first)),
            }
        }
    }

    fn router(hosted: Arc<StubHosted>, local: Arc<StubLocal>, chunk_max_tokens: usize) -> SummaryRouter {
        SummaryRouter::new(
            hosted,
            local,
            Arc::new(WordCounter),
            RouterSettings {
                chunk_max_tokens,
                ..RouterSettings::default()
            },
        )
    }

    fn paragraph() -> String {
        let sentence = "Attention based encoders learn contextual representations that transfer \
                        well to many downstream language understanding benchmarks today.";
        std::iter::repeat(sentence).take(5).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_short_input_both_modes() {
        let hosted = Arc::new(StubHosted::default());
        let local = Arc::new(StubLocal::default());
        let router = router(hosted.clone(), local.clone(), 512);

        for backend in [Backend::Hosted, Backend::Local] {
            let summary = router.summarize_to_string("  tiny input  ", backend).await.unwrap();
            assert_eq!(
                summary,
                "Error: Input text is too short (10 chars). Try a longer document."
            );
        }
        assert!(hosted.calls.lock().unwrap().is_empty());
        assert!(local.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_reports_zero_chars() {
        let router = router(Arc::default(), Arc::default(), 512);
        for backend in [Backend::Hosted, Backend::Local] {
            let outcome = router.summarize("", backend).await.unwrap();
            assert!(matches!(outcome, SummaryOutcome::InputTooShort { chars: 0 }));
            assert_eq!(
                outcome.render(),
                "Error: Input text is too short (0 chars). Try a longer document."
            );
        }
    }

    #[tokio::test]
    async fn test_hosted_sends_whole_text_once() {
        let hosted = Arc::new(StubHosted::default());
        let local = Arc::new(StubLocal::default());
        let text = paragraph().repeat(20);
        let router = router(hosted.clone(), local.clone(), 30);

        let summary = router.summarize_to_string(&text, Backend::Hosted).await.unwrap();
        assert_eq!(summary, "Hosted summary.");

        let calls = hosted.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, Some(1000));
        assert_eq!(
            calls[0].messages[0].content,
            format!("Summarize this research paper:\n{}", text)
        );
        assert!(local.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hosted_failure_propagates() {
        let hosted = Arc::new(StubHosted {
            fail: true,
            ..Default::default()
        });
        let router = router(hosted, Arc::default(), 512);
        let err = router.summarize(&paragraph(), Backend::Hosted).await.unwrap_err();
        assert!(matches!(err, PaperBriefError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_single_chunk_local_summary() {
        let local = Arc::new(StubLocal::default());
        let router = router(Arc::default(), local.clone(), 512);

        let outcome = router.summarize(&paragraph(), Backend::Local).await.unwrap();
        let SummaryOutcome::Summarized { text, backend, chunks } = &outcome else {
            panic!("expected a summary");
        };
        assert_eq!(*backend, Backend::Local);
        assert_eq!(chunks.len(), 1);
        assert_eq!(text, "SAttention");
        assert!(!text.contains("Error:"));
        assert_eq!(outcome.failed_chunks(), 0);

        let calls = local.calls.lock().unwrap();
        assert_eq!(calls[0].max_length, 150);
        assert_eq!(calls[0].min_length, 50);
        assert!(!calls[0].do_sample);
    }

    #[tokio::test]
    async fn test_local_order_preserved_with_placeholders() {
        // 15 max tokens leave a budget of 5: three words plus two special tokens
        let text = "alpha one two FAIL three four SHORT five six omega seven eight \
                    closing words here for length";
        let local = Arc::new(StubLocal::default());
        let router = router(Arc::default(), local.clone(), 15);

        let outcome = router.summarize(text, Backend::Local).await.unwrap();
        let SummaryOutcome::Summarized { text: summary, chunks, .. } = &outcome else {
            panic!("expected a summary");
        };

        let sent: Vec<String> = local.calls.lock().unwrap().iter().map(|r| r.text.clone()).collect();
        assert_eq!(
            sent,
            vec![
                "alpha one two",
                "FAIL three four",
                "SHORT five six",
                "omega seven eight",
                "closing words here",
                "for length",
            ]
        );

        assert_eq!(
            summary,
            "Salpha Error: LLM error: model crashed \
             Error: index out of range in self - Input text may be too short. \
             Somega Sclosing Sfor"
        );
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index(), i);
        }
        assert_eq!(outcome.failed_chunks(), 2);
    }
}
