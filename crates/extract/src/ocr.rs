//! OCR fallback for scanned PDFs
//!
//! Pages are rendered with `pdftoppm`, converted to grayscale, binarized with
//! Otsu's threshold and passed to the `tesseract` CLI.

use image::GrayImage;
use paperbrief_common::{AppConfig, PaperBriefError, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::PageText;

/// Rendering resolution for OCR
pub const DEFAULT_DPI: u32 = 300;

/// External OCR toolchain
#[derive(Debug, Clone)]
pub struct OcrEngine {
    pdftoppm: String,
    tesseract: String,
    language: String,
    dpi: u32,
}

impl OcrEngine {
    /// Create OCR engine from binaries and language
    pub fn new(
        pdftoppm: impl Into<String>,
        tesseract: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
            tesseract: tesseract.into(),
            language: language.into(),
            dpi: DEFAULT_DPI,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.pdftoppm_path.clone(),
            config.tesseract_path.clone(),
            config.ocr_language.clone(),
        )
    }

    /// OCR every page of `pdf_path`
    pub async fn ocr_pdf(&self, pdf_path: &Path) -> Result<Vec<PageText>> {
        let work_dir = std::env::temp_dir().join(format!("paperbrief-ocr-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&work_dir).await?;

        let result = self.ocr_in(pdf_path, &work_dir).await;

        // Clean up rendered pages
        let _ = tokio::fs::remove_dir_all(&work_dir).await;

        result
    }

    async fn ocr_in(&self, pdf_path: &Path, work_dir: &Path) -> Result<Vec<PageText>> {
        let images = self.rasterize(pdf_path, work_dir).await?;
        let total = images.len();

        let mut pages = Vec::with_capacity(total);
        for (i, image_path) in images.iter().enumerate() {
            info!("Processing page {}/{} with OCR...", i + 1, total);

            let prepared = work_dir.join(format!("prepared-{}.png", i + 1));
            preprocess(image_path, &prepared).await?;

            let text = self.recognize(&prepared).await?;
            pages.push(PageText::new(i + 1, text));
        }

        Ok(pages)
    }

    /// Render PDF pages to PNG files, returned in page order
    async fn rasterize(&self, pdf_path: &Path, work_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = work_dir.join("page");

        let output = Command::new(&self.pdftoppm)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .await
            .map_err(|e| PaperBriefError::extraction(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PaperBriefError::extraction(format!(
                "pdftoppm failed: {}",
                stderr.trim()
            )));
        }

        let mut images = Vec::new();
        let mut entries = tokio::fs::read_dir(work_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_page = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("page") && n.ends_with(".png"))
                .unwrap_or(false);
            if is_page {
                images.push(path);
            }
        }

        // pdftoppm zero-pads page numbers, so name order is page order
        images.sort();
        debug!("Rendered {} pages from {}", images.len(), pdf_path.display());

        Ok(images)
    }

    /// Run tesseract on a prepared image
    async fn recognize(&self, image_path: &Path) -> Result<String> {
        let output = Command::new(&self.tesseract)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|e| PaperBriefError::extraction(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PaperBriefError::extraction(format!(
                "tesseract failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Grayscale + binarize `input`, writing the result to `output`
async fn preprocess(input: &Path, output: &Path) -> Result<()> {
    let input = input.to_path_buf();
    let output = output.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let gray = image::open(&input)
            .map_err(|e| {
                PaperBriefError::extraction(format!("Failed to open {}: {}", input.display(), e))
            })?
            .to_luma8();

        binarize(&gray).save(&output).map_err(|e| {
            PaperBriefError::extraction(format!("Failed to write {}: {}", output.display(), e))
        })
    })
    .await
    .map_err(|e| PaperBriefError::internal(format!("Preprocessing task failed: {}", e)))?
}

/// Otsu's method: threshold maximizing between-class variance
pub fn otsu_threshold(histogram: &[u32; 256]) -> u8 {
    let total: u64 = histogram.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }

    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut sum_bg = 0.0;
    let mut weight_bg: u64 = 0;
    let mut best_level = 0u8;
    let mut best_variance = -1.0;

    for (level, &count) in histogram.iter().enumerate() {
        weight_bg += count as u64;
        if weight_bg == 0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0 {
            break;
        }

        sum_bg += level as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg as f64;
        let mean_fg = (sum_all - sum_bg) / weight_fg as f64;
        let variance = weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Pixels above the Otsu threshold become white, the rest black
pub fn binarize(image: &GrayImage) -> GrayImage {
    let mut histogram = [0u32; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }
    let threshold = otsu_threshold(&histogram);

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_otsu_bimodal() {
        let mut histogram = [0u32; 256];
        histogram[20] = 500;
        histogram[200] = 300;
        let t = otsu_threshold(&histogram);
        assert!((20..200).contains(&t));
    }

    #[test]
    fn test_otsu_empty_and_flat() {
        assert_eq!(otsu_threshold(&[0u32; 256]), 0);

        let mut histogram = [0u32; 256];
        histogram[128] = 10;
        assert_eq!(otsu_threshold(&histogram), 0);
    }

    #[test]
    fn test_binarize_separates_ink_from_paper() {
        let image = GrayImage::from_fn(4, 2, |x, _| if x < 2 { Luma([30]) } else { Luma([220]) });
        let out = binarize(&image);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 1).0[0], 0);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);
        assert_eq!(out.get_pixel(3, 1).0[0], 255);
    }

    #[tokio::test]
    async fn test_missing_binary_is_extraction_error() {
        let engine = OcrEngine::new("paperbrief-no-such-pdftoppm", "tesseract", "eng");
        let err = engine.ocr_pdf(Path::new("paper.pdf")).await.unwrap_err();
        assert!(matches!(err, PaperBriefError::Extraction(_)));
    }
}
