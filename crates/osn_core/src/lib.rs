pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{ContentAnalyzer, RepoStatsSource};
pub use storage::ArticleStorage;
pub use types::{Article, ArticleSummary, ExtractionResult, ProjectStats, RepoStats};

/// Case-insensitive title substring filter. An empty query keeps everything.
pub fn filter_by_title(articles: Vec<ArticleSummary>, query: &str) -> Vec<ArticleSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| a.title.to_lowercase().contains(&query))
        .collect()
}

pub mod prelude {
    pub use crate::{Article, ArticleStorage, ContentAnalyzer, Error, RepoStats, RepoStatsSource, Result};
}
