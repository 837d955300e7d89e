//! arXiv export API client

use async_trait::async_trait;
use atom_syndication::{Entry, Feed};
use chrono::Datelike;
use paperbrief_common::{AppConfig, PaperBriefError, Result};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::source::PaperSource;
use crate::types::{collapse_whitespace, PaperRecord};

/// arXiv Atom API client
pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    /// Create new arXiv client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaperBriefError::search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.arxiv_base_url.clone(),
            Duration::from_secs(config.search_timeout_secs),
        )
    }

    /// Build the export API query URL
    pub fn build_query_url(&self, query: &str, num_results: usize) -> Result<Url> {
        let endpoint = format!("{}/api/query", self.base_url);
        let search_query = format!("all:{}", query);
        let max_results = num_results.to_string();

        Url::parse_with_params(
            &endpoint,
            &[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ],
        )
        .map_err(|e| PaperBriefError::config(format!("Invalid arXiv base URL: {}", e)))
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    fn name(&self) -> &str {
        "arxiv"
    }

    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<PaperRecord>> {
        info!("Searching arXiv for: {}", query);

        let url = self.build_query_url(query, num_results)?;
        debug!("arXiv request: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PaperBriefError::from_reqwest("arXiv request failed", e))?;

        if !response.status().is_success() {
            return Err(PaperBriefError::search(format!(
                "arXiv returned status {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PaperBriefError::from_reqwest("Failed to read arXiv response", e))?;

        let mut papers = parse_feed(&body)?;
        papers.truncate(num_results);
        info!("arXiv returned {} papers", papers.len());

        Ok(papers)
    }
}

/// Parse an arXiv Atom feed into paper records
pub fn parse_feed(xml: &[u8]) -> Result<Vec<PaperRecord>> {
    let feed = Feed::read_from(xml)
        .map_err(|e| PaperBriefError::search(format!("Invalid arXiv feed: {}", e)))?;

    let mut papers = Vec::with_capacity(feed.entries().len());
    for entry in feed.entries() {
        // The API reports bad queries as a single entry under /api/errors
        if entry.id().contains("/api/errors") {
            let message = entry
                .summary()
                .map(|s| collapse_whitespace(&s.value))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(PaperBriefError::search(format!("arXiv error: {}", message)));
        }

        papers.push(to_record(entry));
    }

    Ok(papers)
}

fn to_record(entry: &Entry) -> PaperRecord {
    let authors = entry
        .authors()
        .iter()
        .map(|a| a.name().trim())
        .collect::<Vec<_>>()
        .join(", ");

    let year = entry
        .published()
        .map(|d| d.year())
        .unwrap_or_else(|| entry.updated().year());

    let abstract_text = entry
        .summary()
        .map(|s| collapse_whitespace(&s.value))
        .filter(|s| !s.is_empty());

    let pdf_link = entry
        .links()
        .iter()
        .find(|l| l.title() == Some("pdf") || l.mime_type() == Some("application/pdf"))
        .map(|l| l.href().to_string());

    if pdf_link.is_none() {
        warn!("No PDF link for {}", entry.id());
    }

    PaperRecord {
        title: collapse_whitespace(&entry.title().value),
        authors,
        year,
        abstract_text,
        pdf_link,
        arxiv_id: entry.id().to_string(),
        summary: None,
    }
}
