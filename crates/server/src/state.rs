use paperbrief_common::{AppConfig, ModelManager, Result, TokenizerAsset};
use paperbrief_extract::PdfExtractor;
use paperbrief_llm::{
    HfTokenCounter, OllamaClient, OllamaSummarizer, OpenAiClient, OpenAiClientConfig,
    RouterSettings, SummaryRouter, TokenCounter,
};
use paperbrief_scholar::{ArxivClient, PaperSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::workflow::ResearchWorkflow;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Extraction, search and summarization
    pub workflow: ResearchWorkflow,
}

impl AppState {
    /// Build state from configuration, loading the tokenizer
    pub async fn new(config: AppConfig) -> Result<Self> {
        let tokenizer_path = resolve_tokenizer(&config).await?;
        let tokenizer: Arc<dyn TokenCounter> = HfTokenCounter::shared(&tokenizer_path).await?;
        info!("Tokenizer loaded from {}", tokenizer_path.display());

        if config.openai_api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; hosted summarization will fail");
        }
        let hosted = OpenAiClient::new(OpenAiClientConfig::from_app_config(&config))?;

        let ollama = OllamaClient::new(
            config.ollama_base_url.clone(),
            Duration::from_secs(config.local_timeout_secs),
        )?;
        match ollama.test_connection().await {
            Ok(true) => info!("Local model server reachable at {}", ollama.base_url()),
            _ => warn!("Local model server not reachable at {}", ollama.base_url()),
        }
        let local = OllamaSummarizer::new(ollama, config.local_model.clone());

        let router = SummaryRouter::new(
            Arc::new(hosted),
            Arc::new(local),
            tokenizer,
            RouterSettings::from_config(&config),
        );

        let arxiv: Arc<dyn PaperSource> = Arc::new(ArxivClient::from_config(&config)?);
        let workflow = ResearchWorkflow::new(
            Arc::new(router),
            PdfExtractor::from_config(&config),
            vec![arxiv],
        );

        Ok(Self::from_parts(config, workflow))
    }

    /// Assemble state from prebuilt parts
    pub fn from_parts(config: AppConfig, workflow: ResearchWorkflow) -> Self {
        Self { config, workflow }
    }
}

/// Explicit path wins; otherwise download into the models directory
async fn resolve_tokenizer(config: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = &config.tokenizer_path {
        return Ok(path.clone());
    }

    let manager = ModelManager::new(config.models_dir.clone())?;
    let asset = TokenizerAsset::new(config.tokenizer_model.clone(), config.tokenizer_sha256.clone());
    manager.ensure_tokenizer(&asset).await
}
