use chrono::{Local, NaiveDateTime, SubsecRound};
use osn_core::{
    filter_by_title, Article, ArticleStorage, ArticleSummary, ContentAnalyzer, ExtractionResult,
    ProjectStats, RepoStats, RepoStatsSource, Result,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::logging::Logger;

/// Output of the analysis step. `notice` carries a user-facing message when
/// the analyzer failed and an empty extraction was substituted.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub extraction: ExtractionResult,
    pub notice: Option<String>,
}

/// Everything the create view shows after one submission.
#[derive(Debug, Clone, Serialize)]
pub struct CurationOutcome {
    pub article: Article,
    /// `None` when the analysis produced nothing worth saving.
    pub filename: Option<String>,
    pub notices: Vec<String>,
}

/// Runs analyze → resolve → save, one step after the other.
pub struct CurationManager {
    analyzer: Arc<dyn ContentAnalyzer>,
    resolver: Arc<dyn RepoStatsSource>,
    storage: Arc<dyn ArticleStorage>,
}

impl CurationManager {
    pub fn new(
        analyzer: Arc<dyn ContentAnalyzer>,
        resolver: Arc<dyn RepoStatsSource>,
        storage: Arc<dyn ArticleStorage>,
    ) -> Self {
        Self {
            analyzer,
            resolver,
            storage,
        }
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub async fn analyze(&self, text: &str) -> Analysis {
        info!("🧠 Analyzing {} chars with {}", text.chars().count(), self.analyzer.name());
        match self.analyzer.analyze(text).await {
            Ok(extraction) => {
                if extraction.is_empty() {
                    warn!("⚠️ Analyzer reply did not contain a usable extraction");
                }
                info!(
                    "✨ Extracted {} projects, {} companies",
                    extraction.projects.len(),
                    extraction.companies.len()
                );
                Analysis { extraction, notice: None }
            }
            Err(e) => {
                warn!("⚠️ Analysis failed: {}", e);
                Analysis {
                    extraction: ExtractionResult::default(),
                    notice: Some(format!("Analysis failed: {}", e)),
                }
            }
        }
    }

    pub async fn resolve(&self, name: &str) -> RepoStats {
        self.resolver.resolve(name).await
    }

    /// Resolve every project, in order, one at a time.
    pub async fn enrich(&self, projects: &[String]) -> Vec<ProjectStats> {
        let total = projects.len();
        let mut enriched = Vec::with_capacity(total);
        for (i, name) in projects.iter().enumerate() {
            let logger = Logger::new()
                .with_prefix(format!("[{}/{}]", i + 1, total))
                .with_prefix(name.clone());
            logger.info("📦 Resolving repository");
            let stats = self.resolver.resolve(name).await;
            if let RepoStats::FetchError { .. } = stats {
                logger.warn("Repository data could not be fetched");
            } else {
                logger.debug(&format!("⭐ {} | 🔄 {} at {}", stats.stars_label(), stats.forks_label(), stats.url()));
            }
            enriched.push(ProjectStats {
                name: name.clone(),
                stats,
            });
        }
        enriched
    }

    /// Resolve the projects and write the article, returning its file name.
    pub async fn save(
        &self,
        title: &str,
        body: &str,
        projects: &[String],
        companies: &[String],
    ) -> Result<String> {
        let article = Article {
            title: title.to_string(),
            body: body.to_string(),
            projects: self.enrich(projects).await,
            companies: companies.to_vec(),
            created_at: now(),
        };
        self.store(&article).await
    }

    pub async fn store(&self, article: &Article) -> Result<String> {
        let filename = self.storage.store_article(article).await?;
        info!("💾 Saved article: {}", filename);
        Ok(filename)
    }

    /// The full create flow. Stats are resolved once and reused for both the
    /// rendered result and the saved file.
    pub async fn process(&self, text: &str) -> Result<CurationOutcome> {
        let Analysis { extraction, notice } = self.analyze(text).await;
        let mut notices: Vec<String> = notice.into_iter().collect();

        let projects = self.enrich(&extraction.projects).await;
        notices.extend(projects.iter().filter_map(|p| match p.stats {
            RepoStats::FetchError { .. } => Some(format!("Could not fetch repository data for {}", p.name)),
            _ => None,
        }));

        let article = Article {
            title: extraction.title,
            body: extraction.body,
            projects,
            companies: extraction.companies,
            created_at: now(),
        };

        let filename = if article.title.trim().is_empty() && article.body.trim().is_empty() {
            notices.push("Nothing to save: the analysis returned no article".to_string());
            None
        } else {
            Some(self.store(&article).await?)
        };

        Ok(CurationOutcome { article, filename, notices })
    }

    /// Stored articles, newest first, optionally filtered by title.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<ArticleSummary>> {
        let articles = self.storage.list_articles().await?;
        Ok(match query {
            Some(query) => filter_by_title(articles, query),
            None => articles,
        })
    }

    pub async fn read(&self, filename: &str) -> Result<String> {
        self.storage.read_article(filename).await
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
