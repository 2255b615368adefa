use async_trait::async_trait;
use crate::types::{ExtractionResult, RepoStats};
use crate::Result;

#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    /// Extract projects, companies and a rewritten news article from raw text.
    ///
    /// A reply that is not valid structured data yields an empty
    /// [`ExtractionResult`]; only transport or non-success HTTP outcomes are
    /// errors.
    async fn analyze(&self, text: &str) -> Result<ExtractionResult>;
}

#[async_trait]
pub trait RepoStatsSource: Send + Sync {
    /// Resolve a free-text project name to popularity metrics. Never fails;
    /// failures are reported through the [`RepoStats`] variant.
    async fn resolve(&self, raw_name: &str) -> RepoStats;
}
