use async_trait::async_trait;
use crate::types::{Article, ArticleSummary};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Persist an article, returning the generated file name.
    async fn store_article(&self, article: &Article) -> Result<String>;

    /// All stored articles, newest first.
    async fn list_articles(&self) -> Result<Vec<ArticleSummary>>;

    /// Full rendered content of a stored article.
    async fn read_article(&self, filename: &str) -> Result<String>;
}
