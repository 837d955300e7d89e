//! OpenAI-compatible chat-completion client (hosted backend)

use async_trait::async_trait;
use paperbrief_common::{AppConfig, PaperBriefError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::llm_trait::ChatBackend;

/// Hosted client settings
#[derive(Clone, Debug)]
pub struct OpenAiClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiClientConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    cfg: OpenAiClientConfig,
}

impl OpenAiClient {
    pub fn new(cfg: OpenAiClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!(
            "Hosted LLM client initialized: {} model={} (timeout {:?})",
            cfg.base_url, cfg.model, cfg.timeout
        );
        Ok(Self { http, cfg })
    }

    fn api_key(&self) -> Result<&str> {
        self.cfg
            .api_key
            .as_deref()
            .ok_or_else(|| PaperBriefError::config("OPENAI_API_KEY is not set"))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'))
    }

    fn build_api_request(&self, req: &ChatCompletionRequest) -> ApiChatCompletionRequest {
        ApiChatCompletionRequest {
            model: req.model.clone().unwrap_or_else(|| self.cfg.model.clone()),
            max_tokens: req.max_tokens,
            messages: req
                .messages
                .iter()
                .map(|m| ApiChatMessage {
                    role: m.role.as_api_str().to_string(),
                    content: Some(m.content.clone()),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        if request.messages.is_empty() {
            return Err(PaperBriefError::invalid_input(
                "chat completion requires at least one message",
            ));
        }

        let api_key = self.api_key()?;
        let api_request = self.build_api_request(&request);

        debug!(
            "Sending chat completion - Model: {}, Messages: {}, max_tokens: {:?}",
            api_request.model,
            api_request.messages.len(),
            api_request.max_tokens
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| PaperBriefError::from_reqwest("Chat completion request failed", e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PaperBriefError::from_reqwest("Failed to read chat completion body", e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorEnvelope>(&bytes)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PaperBriefError::llm(format!("api error {}: {}", status, message)));
        }

        parse_completion(&bytes)
    }
}

fn parse_completion(bytes: &[u8]) -> Result<ChatCompletionResponse> {
    let parsed: ApiChatCompletionResponse = serde_json::from_slice(bytes)
        .map_err(|e| PaperBriefError::llm(format!("Failed to decode chat completion: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .ok_or_else(|| PaperBriefError::llm("Chat completion returned no content"))?;

    Ok(ChatCompletionResponse {
        content,
        usage: parsed.usage.map(|usage| UsageMetrics {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChatRole {
    User,
}

impl ChatRole {
    fn as_api_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
        }
    }
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatCompletionResponse {
    pub content: String,
    pub usage: Option<UsageMetrics>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UsageMetrics {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize)]
struct ApiChatCompletionRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: Vec<ApiChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiChatCompletionResponse {
    choices: Vec<ApiChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiChatChoice {
    message: ApiChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}
