use async_trait::async_trait;
use tracing::debug;

use crate::client::OllamaClient;
use crate::llm_trait::LocalSummarizer;
use crate::prompts::chunk_prompt;
use crate::types::{GenerateOptions, GenerateRequest, LocalSummaryError, LocalSummaryRequest};

/// Local summarization backend served by Ollama
///
/// Every chunk goes to the model; `min_length` and `max_length` bound the
/// generated summary through the prompt and `num_predict`.
pub struct OllamaSummarizer {
    client: OllamaClient,
    model: String,
}

impl OllamaSummarizer {
    /// Create new local summarizer
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn build_request(&self, request: &LocalSummaryRequest) -> GenerateRequest {
        let options = if request.do_sample {
            GenerateOptions {
                num_predict: Some(request.max_length as i32),
                ..Default::default()
            }
        } else {
            GenerateOptions::deterministic(request.max_length as i32)
        };

        GenerateRequest {
            model: self.model.clone(),
            prompt: chunk_prompt(&request.text, request.min_length, request.max_length),
            stream: Some(false),
            options: Some(options),
        }
    }
}

#[async_trait]
impl LocalSummarizer for OllamaSummarizer {
    async fn summarize(&self, request: LocalSummaryRequest) -> Result<String, LocalSummaryError> {
        debug!("Local summary request - {} input chars", request.text.len());
        let response = self.client.generate(self.build_request(&request)).await?;

        Ok(response.trim().replace('\n', " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn summarizer(base_url: &str) -> OllamaSummarizer {
        let client = OllamaClient::new(base_url, Duration::from_secs(5)).unwrap();
        OllamaSummarizer::new(client, "llama3.2")
    }

    fn request(text: &str) -> LocalSummaryRequest {
        LocalSummaryRequest {
            text: text.to_string(),
            max_length: 150,
            min_length: 50,
            do_sample: false,
        }
    }

    /// One-shot Ollama stand-in: captures the request body, answers `reply`
    async fn serve_once(reply: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let raw = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = raw.find("\r\n\r\n") {
                    let content_length = raw[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length || n == 0 {
                        break;
                    }
                } else if n == 0 {
                    break;
                }
            }

            let body = format!(
                r#"{{"model":"llama3.2","response":{},"done":true}}"#,
                serde_json::to_string(reply).unwrap()
            );
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let raw = String::from_utf8_lossy(&buf).to_string();
            raw.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default()
        });

        (base_url, handle)
    }

    #[test]
    fn test_deterministic_request() {
        let generate = summarizer("http://127.0.0.1:9").build_request(&request("A passage."));
        let value = serde_json::to_value(&generate).unwrap();
        assert_eq!(value["model"], "llama3.2");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["temperature"], 0.0);
        assert_eq!(value["options"]["top_k"], 1);
        assert_eq!(value["options"]["num_predict"], 150);
        assert!(value["prompt"].as_str().unwrap().contains("50 to 150 tokens"));
    }

    #[tokio::test]
    async fn test_short_chunk_reaches_model() {
        let (base_url, server) = serve_once("A compact\nsummary.").await;

        // About 30 tokens, well under min_length
        let text = "Sparse attention lets transformers read long papers by attending to a few \
                    selected positions per query, which keeps memory linear in sequence length.";
        let summary = summarizer(&base_url).summarize(request(text)).await.unwrap();
        assert_eq!(summary, "A compact summary.");

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert!(body["prompt"].as_str().unwrap().contains(text));
        assert_eq!(body["options"]["num_predict"], 150);
    }

    struct WordCounter;

    impl crate::tokenizer::TokenCounter for WordCounter {
        fn count_tokens(&self, text: &str) -> paperbrief_common::Result<usize> {
            Ok(text.split_whitespace().count() + 2)
        }
    }

    struct NoHosted;

    #[async_trait]
    impl crate::llm_trait::ChatBackend for NoHosted {
        async fn chat_completion(
            &self,
            _request: crate::openai::ChatCompletionRequest,
        ) -> paperbrief_common::Result<crate::openai::ChatCompletionResponse> {
            Err(paperbrief_common::PaperBriefError::config("hosted backend not configured"))
        }
    }

    #[tokio::test]
    async fn test_short_document_summarized_locally() {
        use crate::summarize::{RouterSettings, SummaryRouter};
        use crate::types::Backend;
        use std::sync::Arc;

        let (base_url, server) = serve_once("Short paper summary.").await;
        let router = SummaryRouter::new(
            Arc::new(NoHosted),
            Arc::new(summarizer(&base_url)),
            Arc::new(WordCounter),
            RouterSettings::default(),
        );

        // Single chunk of roughly 30 words, above the 50 char floor
        let text = "We propose a retrieval augmented summarizer for scientific articles that \
                    selects salient sections before generation and report consistent gains on \
                    two public benchmarks.";
        let summary = router.summarize_to_string(text, Backend::Local).await.unwrap();
        assert_eq!(summary, "Short paper summary.");
        assert!(!server.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported() {
        let err = summarizer("http://127.0.0.1:9")
            .summarize(request("Any passage at all."))
            .await
            .unwrap_err();
        assert!(matches!(err, LocalSummaryError::Backend(_)));
    }
}
