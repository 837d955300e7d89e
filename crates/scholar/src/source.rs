use async_trait::async_trait;
use paperbrief_common::Result;

use crate::types::PaperRecord;

/// Academic paper search backend
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Short identifier used in the `source` query parameter
    fn name(&self) -> &str;

    /// Search for up to `num_results` papers, newest first
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<PaperRecord>>;
}
