use paperbrief_common::{PaperBriefError, Result};
use paperbrief_extract::{is_sentinel, PdfExtractor};
use paperbrief_llm::{Backend, SummaryRouter};
use paperbrief_scholar::{PaperRecord, PaperSource};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Preview length for logged extraction output
const PREVIEW_CHARS: usize = 500;

/// Orchestrates extraction, search and summarization for the HTTP layer
pub struct ResearchWorkflow {
    router: Arc<SummaryRouter>,
    extractor: PdfExtractor,
    sources: Vec<Arc<dyn PaperSource>>,
}

impl ResearchWorkflow {
    /// Create new workflow
    pub fn new(
        router: Arc<SummaryRouter>,
        extractor: PdfExtractor,
        sources: Vec<Arc<dyn PaperSource>>,
    ) -> Self {
        Self {
            router,
            extractor,
            sources,
        }
    }

    /// Summarize pasted text
    pub async fn summarize_text(&self, text: &str, use_gpt: bool) -> Result<String> {
        self.router
            .summarize_to_string(text, Backend::from_use_llm(use_gpt))
            .await
    }

    /// Extract a stored PDF and summarize it
    ///
    /// Extraction sentinels are summarized like any other text.
    pub async fn summarize_pdf(&self, path: &Path, use_gpt: bool) -> Result<String> {
        let text = self.extractor.extract_text(path).await;

        if text.trim().is_empty() {
            return Err(PaperBriefError::invalid_input("Could not extract text from PDF."));
        }
        if is_sentinel(&text) {
            warn!("Extraction for {} produced: {}", path.display(), text);
        }

        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        debug!("Extracted text (first {} chars):\n{}", PREVIEW_CHARS, preview);

        self.summarize_text(&text, use_gpt).await
    }

    /// Search `source` for papers
    pub async fn search(&self, source: &str, query: &str, num_results: usize) -> Result<Vec<PaperRecord>> {
        self.source(source)?.search(query, num_results).await
    }

    /// Search `source` and attach a summary to every paper, in result order
    pub async fn search_and_summarize(
        &self,
        source: &str,
        query: &str,
        num_results: usize,
        use_gpt: bool,
    ) -> Result<Vec<PaperRecord>> {
        let mut papers = self.search(source, query, num_results).await?;
        let total = papers.len();

        for (i, paper) in papers.iter_mut().enumerate() {
            info!("Summarizing paper {}/{}: {}", i + 1, total, paper.title);
            let summary = self.summarize_text(&paper.summary_input(), use_gpt).await?;
            paper.summary = Some(summary);
        }

        Ok(papers)
    }

    fn source(&self, name: &str) -> Result<&Arc<dyn PaperSource>> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| PaperBriefError::invalid_input(format!("Unsupported source: {}", name)))
    }
}
