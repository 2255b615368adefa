use async_trait::async_trait;
use osn_core::{Article, ArticleStorage, ArticleSummary, Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::document;

/// Flat-file store: one Markdown document per article in a single directory.
/// The file name is the only index.
#[derive(Debug, Clone)]
pub struct MarkdownStorage {
    dir: PathBuf,
}

impl MarkdownStorage {
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Storage(format!("Failed to create article directory {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn summarize(&self, path: PathBuf, filename: String) -> Option<ArticleSummary> {
        let Some(created_at) = document::parse_timestamp(&filename) else {
            warn!("⚠️ Skipping {}: file name does not start with a timestamp", filename);
            return None;
        };
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("⚠️ Skipping {}: {}", filename, e);
                return None;
            }
        };
        Some(ArticleSummary {
            title: document::title_from_content(&content),
            filename,
            created_at,
            path,
        })
    }
}

#[async_trait]
impl ArticleStorage for MarkdownStorage {
    async fn store_article(&self, article: &Article) -> Result<String> {
        let filename = document::file_name(article);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, document::render(article)).await?;
        debug!("Wrote {}", path.display());
        Ok(filename)
    }

    async fn list_articles(&self) -> Result<Vec<ArticleSummary>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut articles = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(document::EXTENSION) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            if let Some(summary) = self.summarize(path, filename).await {
                articles.push(summary);
            }
        }

        articles.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(articles)
    }

    async fn read_article(&self, filename: &str) -> Result<String> {
        if !document::is_valid_file_name(filename) {
            return Err(Error::InvalidInput(format!("Invalid article name: {}", filename)));
        }
        match tokio::fs::read_to_string(self.dir.join(filename)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(filename.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
