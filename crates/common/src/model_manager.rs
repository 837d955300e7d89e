//! Model Manager for tokenizer assets
//!
//! Downloads and verifies the `tokenizer.json` used to size chunks for the
//! local summarization model.

use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const HF_BASE_URL: &str = "https://huggingface.co";

/// Tokenizer file published with a Hugging Face model
#[derive(Debug, Clone)]
pub struct TokenizerAsset {
    /// Model id (e.g., "facebook/bart-large-cnn")
    pub model_id: String,

    /// Expected SHA256 hash (hex) for verification
    pub sha256: Option<String>,
}

impl TokenizerAsset {
    /// Create asset for a model id
    pub fn new(model_id: impl Into<String>, sha256: Option<String>) -> Self {
        Self {
            model_id: model_id.into(),
            sha256,
        }
    }

    /// Download URL on the Hugging Face hub
    pub fn url(&self) -> String {
        format!("{}/{}/resolve/main/tokenizer.json", HF_BASE_URL, self.model_id)
    }

    /// Directory name for this model ("facebook/bart-large-cnn" -> "facebook--bart-large-cnn")
    pub fn dir_name(&self) -> String {
        self.model_id.replace('/', "--")
    }
}

/// Model Manager
pub struct ModelManager {
    models_dir: PathBuf,
    client: Client,
}

impl ModelManager {
    /// Create new model manager
    pub fn new(models_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { models_dir, client })
    }

    /// Local path where the asset's tokenizer.json lives
    pub fn tokenizer_path(&self, asset: &TokenizerAsset) -> PathBuf {
        self.models_dir.join(asset.dir_name()).join("tokenizer.json")
    }

    /// Ensure tokenizer exists locally, download if missing
    pub async fn ensure_tokenizer(&self, asset: &TokenizerAsset) -> Result<PathBuf> {
        let path = self.tokenizer_path(asset);

        if path.exists() {
            if self.verify_file(&path, asset.sha256.as_deref()).await? {
                info!("Tokenizer already present: {}", path.display());
                return Ok(path);
            }
            warn!("Tokenizer checksum mismatch, re-downloading: {}", path.display());
            fs::remove_file(&path).await?;
        }

        info!("Tokenizer not found, downloading: {}", asset.model_id);
        self.download(&asset.url(), &path).await?;

        if !self.verify_file(&path, asset.sha256.as_deref()).await? {
            fs::remove_file(&path).await?;
            return Err(anyhow::anyhow!(
                "Downloaded tokenizer for {} failed checksum verification",
                asset.model_id
            )
            .into());
        }

        Ok(path)
    }

    /// Download a file to `dest` through a temporary file
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        info!("Downloading {} -> {}", url, dest.display());

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to download: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Download failed with status: {}", response.status()).into());
        }

        let pb = match response.content_length() {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .map_err(|e| anyhow::anyhow!("Invalid progress template: {}", e))?
                .progress_chars("#>-"),
        );

        let temp_path = dest.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        use futures::StreamExt;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| anyhow::anyhow!("Download error: {}", e))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }

        pb.finish_with_message("Download complete");
        file.sync_all().await?;
        drop(file);

        if downloaded == 0 {
            fs::remove_file(&temp_path).await?;
            return Err(anyhow::anyhow!("Downloaded file is empty: {}", url).into());
        }

        fs::rename(&temp_path, dest).await?;

        info!("Download successful: {} ({} bytes)", dest.display(), downloaded);

        Ok(())
    }

    /// Verify file integrity
    pub async fn verify_file(&self, path: &Path, expected_hash: Option<&str>) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        let Some(expected) = expected_hash else {
            return Ok(true);
        };

        let data = fs::read(path).await?;
        Ok(sha256_hex(&data).eq_ignore_ascii_case(expected))
    }
}

/// Hex-encoded SHA256 digest
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_url_and_dir() {
        let asset = TokenizerAsset::new("facebook/bart-large-cnn", None);
        assert_eq!(
            asset.url(),
            "https://huggingface.co/facebook/bart-large-cnn/resolve/main/tokenizer.json"
        );
        assert_eq!(asset.dir_name(), "facebook--bart-large-cnn");
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_existing_tokenizer_is_reused() {
        let dir = std::env::temp_dir().join(format!("paperbrief-models-{}", std::process::id()));
        let manager = ModelManager::new(dir.clone()).unwrap();
        let asset = TokenizerAsset::new("org/model", Some(sha256_hex(b"{}")));

        let path = manager.tokenizer_path(&asset);
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"{}").await.unwrap();

        let resolved = manager.ensure_tokenizer(&asset).await.unwrap();
        assert_eq!(resolved, path);

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_verify_missing_file() {
        let manager = ModelManager::new(PathBuf::from("./does-not-exist")).unwrap();
        let ok = manager
            .verify_file(Path::new("./does-not-exist/tokenizer.json"), None)
            .await
            .unwrap();
        assert!(!ok);
    }
}
