use paperbrief_common::{PaperBriefError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::types::{GenerateRequest, GenerateResponse};

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama client initialized: {} (timeout {:?})", base_url, timeout);
        Ok(Self { base_url, client })
    }

    /// Generate text with Ollama (single attempt)
    pub async fn generate(&self, request: GenerateRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(
            "Sending generate request to Ollama - Model: {}, Prompt length: {}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PaperBriefError::from_reqwest("Ollama request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaperBriefError::llm(format!(
                "Ollama API error {}: {}",
                status,
                body.trim()
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PaperBriefError::llm(format!("Failed to parse Ollama response: {}", e)))?;

        if result.response.trim().is_empty() {
            return Err(PaperBriefError::llm("Empty response from Ollama"));
        }

        debug!(
            "Received response from Ollama - Model: {}, Length: {}, Done: {}",
            result.model,
            result.response.len(),
            result.done
        );

        Ok(result.response)
    }

    /// Test connection to Ollama
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PaperBriefError::from_reqwest("Failed to connect to Ollama", e))?;
        Ok(response.status().is_success())
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let client = OllamaClient::new("http://localhost:11434/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is closed on test hosts
        let client = OllamaClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.test_connection().await.unwrap_err();
        assert!(matches!(
            err,
            PaperBriefError::Network(_) | PaperBriefError::Timeout(_)
        ));
    }
}
