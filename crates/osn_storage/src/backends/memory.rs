use async_trait::async_trait;
use osn_core::{Article, ArticleStorage, ArticleSummary, Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::document;

struct StoredArticle {
    summary: ArticleSummary,
    content: String,
}

/// Non-persistent store with the same naming and ordering rules as
/// [`MarkdownStorage`](super::MarkdownStorage).
#[derive(Clone, Default)]
pub struct MemoryStorage {
    articles: Arc<RwLock<Vec<StoredArticle>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn store_article(&self, article: &Article) -> Result<String> {
        let filename = document::file_name(article);
        let content = document::render(article);
        let stored = StoredArticle {
            summary: ArticleSummary {
                filename: filename.clone(),
                title: document::title_from_content(&content),
                created_at: article.created_at,
                path: PathBuf::from(&filename),
            },
            content,
        };

        let mut articles = self.articles.write().await;
        if let Some(existing) = articles.iter_mut().find(|a| a.summary.filename == filename) {
            *existing = stored;
        } else {
            articles.push(stored);
        }
        Ok(filename)
    }

    async fn list_articles(&self) -> Result<Vec<ArticleSummary>> {
        let articles = self.articles.read().await;
        let mut summaries: Vec<ArticleSummary> = articles.iter().map(|a| a.summary.clone()).collect();
        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(summaries)
    }

    async fn read_article(&self, filename: &str) -> Result<String> {
        if !document::is_valid_file_name(filename) {
            return Err(Error::InvalidInput(format!("Invalid article name: {}", filename)));
        }
        let articles = self.articles.read().await;
        articles
            .iter()
            .find(|a| a.summary.filename == filename)
            .map(|a| a.content.clone())
            .ok_or_else(|| Error::NotFound(filename.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str, day: u32) -> Article {
        Article {
            title: title.to_string(),
            body: "body".to_string(),
            projects: vec![],
            companies: vec!["Acme".to_string()],
            created_at: NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let first = storage.store_article(&article("First", 1)).await.unwrap();
        let second = storage.store_article(&article("Second", 2)).await.unwrap();

        let listed = storage.list_articles().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].filename, second);
        assert_eq!(listed[1].filename, first);

        let content = storage.read_article(&first).await.unwrap();
        assert!(content.starts_with("# First\n"));
        assert!(content.contains("- Acme"));
        assert!(matches!(storage.read_article("nope.md").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_memory_storage_overwrites_same_name() {
        let storage = MemoryStorage::new();
        storage.store_article(&article("Same", 1)).await.unwrap();
        storage.store_article(&article("Same", 1)).await.unwrap();
        assert_eq!(storage.list_articles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_storage_lists_titles_like_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let markdown = crate::MarkdownStorage::new(dir.path()).await.unwrap();
        let memory = MemoryStorage::new();

        for title in ["# Heading marks", "Two\nlines", "Wait... what: v1.2"] {
            let a = article(title, 3);
            memory.store_article(&a).await.unwrap();
            markdown.store_article(&a).await.unwrap();
        }

        let from_memory: Vec<_> = memory.list_articles().await.unwrap().into_iter().map(|a| a.title).collect();
        let from_disk: Vec<_> = markdown.list_articles().await.unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(from_memory, from_disk);
        assert!(from_memory.contains(&"Heading marks".to_string()));
        assert!(from_memory.contains(&"Two".to_string()));
    }

    #[tokio::test]
    async fn test_memory_storage_rejects_paths() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.read_article("../a.md").await, Err(Error::InvalidInput(_))));
    }
}
