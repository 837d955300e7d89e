//! Token counting for chunk sizing

use paperbrief_common::{PaperBriefError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::Tokenizer;
use tokio::sync::OnceCell;
use tracing::info;

/// Counts tokens the way the target model sees them
pub trait TokenCounter: Send + Sync {
    /// Number of token ids for `text`, special tokens included
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

/// Hugging Face `tokenizer.json` backed counter
#[derive(Debug, Clone)]
pub struct HfTokenCounter {
    inner: Tokenizer,
}

static SHARED: OnceCell<Arc<HfTokenCounter>> = OnceCell::const_new();

impl HfTokenCounter {
    /// Load a tokenizer definition from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut inner = Tokenizer::from_file(path).map_err(|e| {
            PaperBriefError::llm(format!(
                "Failed to load tokenizer {}: {}",
                path.display(),
                e
            ))
        })?;

        // Counts must reflect the full text
        inner
            .with_truncation(None)
            .map_err(|e| PaperBriefError::llm(format!("Failed to disable truncation: {}", e)))?;
        inner.with_padding(None);

        info!("Tokenizer loaded: {}", path.display());
        Ok(Self { inner })
    }

    /// Process-wide tokenizer, loaded on first access
    ///
    /// `path` is only read by the first caller; later calls return the
    /// already loaded instance.
    pub async fn shared(path: &Path) -> Result<Arc<Self>> {
        SHARED
            .get_or_try_init(|| Self::load_blocking(path.to_path_buf()))
            .await
            .cloned()
    }

    async fn load_blocking(path: PathBuf) -> Result<Arc<Self>> {
        let loaded = tokio::task::spawn_blocking(move || Self::from_file(&path))
            .await
            .map_err(|e| PaperBriefError::internal(format!("Tokenizer load task failed: {}", e)))?;
        loaded.map(Arc::new)
    }
}

impl TokenCounter for HfTokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| PaperBriefError::llm(format!("Tokenization failed: {}", e)))?;
        Ok(encoding.get_ids().len())
    }
}
