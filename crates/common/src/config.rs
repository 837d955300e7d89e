use crate::error::PaperBriefError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// PaperBrief application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upload directory path
    pub upload_dir: PathBuf,

    /// Directory holding downloaded tokenizer files
    pub models_dir: PathBuf,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// API key for the hosted chat-completion backend
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,

    /// Hosted chat-completion base URL
    pub openai_base_url: String,

    /// Hosted chat-completion model
    pub openai_model: String,

    /// Output token cap for the hosted backend
    pub llm_max_tokens: u32,

    /// Hosted backend request timeout (seconds)
    pub llm_timeout_secs: u64,

    /// Ollama API base URL (local summarization model)
    pub ollama_base_url: String,

    /// Local summarization model name
    pub local_model: String,

    /// Local backend request timeout (seconds)
    pub local_timeout_secs: u64,

    /// Hugging Face model id whose tokenizer sizes chunks
    pub tokenizer_model: String,

    /// Explicit tokenizer.json path (skips download)
    pub tokenizer_path: Option<PathBuf>,

    /// Expected SHA256 of the downloaded tokenizer.json
    pub tokenizer_sha256: Option<String>,

    /// Token window per chunk for the local backend
    pub chunk_max_tokens: usize,

    /// Minimum trimmed input length in characters
    pub min_text_length: usize,

    /// Minimum summary length per chunk (tokens)
    pub summary_min_length: u32,

    /// Maximum summary length per chunk (tokens)
    pub summary_max_length: u32,

    /// arXiv export API base URL
    pub arxiv_base_url: String,

    /// Academic search request timeout (seconds)
    pub search_timeout_secs: u64,

    /// pdftoppm binary used to rasterize scanned PDFs
    pub pdftoppm_path: String,

    /// tesseract binary used for OCR
    pub tesseract_path: String,

    /// OCR language code
    pub ocr_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./data/uploads"),
            models_dir: PathBuf::from("./data/models"),
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o".to_string(),
            llm_max_tokens: 1000,
            llm_timeout_secs: 120,
            ollama_base_url: "http://localhost:11434".to_string(),
            local_model: "llama3.2:latest".to_string(),
            local_timeout_secs: 300,
            tokenizer_model: "facebook/bart-large-cnn".to_string(),
            tokenizer_path: None,
            tokenizer_sha256: None,
            chunk_max_tokens: 512,
            min_text_length: 50,
            summary_min_length: 50,
            summary_max_length: 150,
            arxiv_base_url: "http://export.arxiv.org".to_string(),
            search_timeout_secs: 30,
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, PaperBriefError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            upload_dir: Self::get_env_path("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            models_dir: Self::get_env_path("MODELS_DIR").unwrap_or(defaults.models_dir),
            server_host: Self::get_env("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: Self::get_env("LOG_LEVEL").unwrap_or(defaults.log_level),
            openai_api_key: Self::get_env("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            openai_base_url: Self::get_env("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openai_model: Self::get_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            llm_max_tokens: Self::get_env_parsed("LLM_MAX_TOKENS")
                .unwrap_or(defaults.llm_max_tokens),
            llm_timeout_secs: Self::get_env_parsed("LLM_TIMEOUT_SECS")
                .unwrap_or(defaults.llm_timeout_secs),
            ollama_base_url: Self::get_env("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            local_model: Self::get_env("LOCAL_MODEL").unwrap_or(defaults.local_model),
            local_timeout_secs: Self::get_env_parsed("LOCAL_TIMEOUT_SECS")
                .unwrap_or(defaults.local_timeout_secs),
            tokenizer_model: Self::get_env("TOKENIZER_MODEL").unwrap_or(defaults.tokenizer_model),
            tokenizer_path: Self::get_env_path("TOKENIZER_PATH"),
            tokenizer_sha256: Self::get_env("TOKENIZER_SHA256"),
            chunk_max_tokens: Self::get_env_parsed("CHUNK_MAX_TOKENS")
                .unwrap_or(defaults.chunk_max_tokens),
            min_text_length: Self::get_env_parsed("MIN_TEXT_LENGTH")
                .unwrap_or(defaults.min_text_length),
            summary_min_length: Self::get_env_parsed("SUMMARY_MIN_LENGTH")
                .unwrap_or(defaults.summary_min_length),
            summary_max_length: Self::get_env_parsed("SUMMARY_MAX_LENGTH")
                .unwrap_or(defaults.summary_max_length),
            arxiv_base_url: Self::get_env("ARXIV_BASE_URL").unwrap_or(defaults.arxiv_base_url),
            search_timeout_secs: Self::get_env_parsed("SEARCH_TIMEOUT_SECS")
                .unwrap_or(defaults.search_timeout_secs),
            pdftoppm_path: Self::get_env("PDFTOPPM_PATH").unwrap_or(defaults.pdftoppm_path),
            tesseract_path: Self::get_env("TESSERACT_PATH").unwrap_or(defaults.tesseract_path),
            ocr_language: Self::get_env("OCR_LANGUAGE").unwrap_or(defaults.ocr_language),
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    fn get_env(key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), PaperBriefError> {
        let dirs = vec![&self.upload_dir, &self.models_dir, &self.log_dir];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    PaperBriefError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get full path for uploaded file
    pub fn get_upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), PaperBriefError> {
        for (name, url) in [
            ("OpenAI", &self.openai_base_url),
            ("Ollama", &self.ollama_base_url),
            ("arXiv", &self.arxiv_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PaperBriefError::config(format!(
                    "{} base URL must start with http:// or https://",
                    name
                )));
            }
        }

        if self.server_port == 0 {
            return Err(PaperBriefError::config("Server port cannot be 0"));
        }

        // The chunker keeps a 10-token safety margin below the window
        if self.chunk_max_tokens <= 10 {
            return Err(PaperBriefError::config(
                "CHUNK_MAX_TOKENS must be greater than 10",
            ));
        }

        if self.summary_min_length > self.summary_max_length {
            return Err(PaperBriefError::config(format!(
                "SUMMARY_MIN_LENGTH ({}) exceeds SUMMARY_MAX_LENGTH ({})",
                self.summary_min_length, self.summary_max_length
            )));
        }

        if self.tokenizer_model.is_empty() && self.tokenizer_path.is_none() {
            return Err(PaperBriefError::config(
                "Either TOKENIZER_MODEL or TOKENIZER_PATH must be set",
            ));
        }

        Ok(())
    }
}
