pub mod config;
pub mod error;
pub mod logger;
pub mod model_manager;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::PaperBriefError;
pub use model_manager::{sha256_hex, ModelManager, TokenizerAsset};
pub type Result<T> = std::result::Result<T, PaperBriefError>;
