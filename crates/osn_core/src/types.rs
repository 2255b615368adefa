use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structured facts pulled out of a pasted text by a [`ContentAnalyzer`](crate::ContentAnalyzer).
///
/// Every field defaults to empty so a reply that is missing keys still
/// deserializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default, rename = "news_title")]
    pub title: String,
    #[serde(default, rename = "news_content")]
    pub body: String,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
            && self.companies.is_empty()
            && self.title.is_empty()
            && self.body.is_empty()
    }
}

/// Popularity metrics for one project name.
///
/// Counts are kept as the strings the code host renders (e.g. `"1234"` or
/// `"12.3k"`); `"0"` means the counter was not present on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepoStats {
    Found {
        stars: String,
        forks: String,
        url: String,
        canonical_name: Option<String>,
    },
    NotFound {
        url: String,
    },
    FetchError {
        url: String,
    },
}

impl RepoStats {
    pub fn url(&self) -> &str {
        match self {
            RepoStats::Found { url, .. } => url,
            RepoStats::NotFound { url } => url,
            RepoStats::FetchError { url } => url,
        }
    }

    pub fn stars_label(&self) -> &str {
        match self {
            RepoStats::Found { stars, .. } => stars,
            RepoStats::NotFound { .. } => "not found",
            RepoStats::FetchError { .. } => "fetch failed",
        }
    }

    pub fn forks_label(&self) -> &str {
        match self {
            RepoStats::Found { forks, .. } => forks,
            RepoStats::NotFound { .. } => "not found",
            RepoStats::FetchError { .. } => "fetch failed",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RepoStats::Found { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub name: String,
    pub stats: RepoStats,
}

/// A curated article as it is written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub projects: Vec<ProjectStats>,
    pub companies: Vec<String>,
    /// Local wall-clock time, second granularity.
    pub created_at: NaiveDateTime,
}

/// One entry of a storage listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub filename: String,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_result_uses_wire_names() {
        let json = r#"{"projects":["foo/bar"],"companies":["Acme"],"news_title":"T","news_content":"C"}"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.projects, vec!["foo/bar"]);
        assert_eq!(result.companies, vec!["Acme"]);
        assert_eq!(result.title, "T");
        assert_eq!(result.body, "C");
    }

    #[test]
    fn test_extraction_result_missing_keys_default() {
        let result: ExtractionResult = serde_json::from_str(r#"{"news_title":"Only"}"#).unwrap();
        assert!(result.projects.is_empty());
        assert!(result.companies.is_empty());
        assert_eq!(result.title, "Only");
        assert!(result.body.is_empty());
        assert!(!result.is_empty());
        assert!(ExtractionResult::default().is_empty());
    }

    #[test]
    fn test_repo_stats_labels() {
        let found = RepoStats::Found {
            stars: "10".to_string(),
            forks: "2".to_string(),
            url: "https://github.com/a/b".to_string(),
            canonical_name: Some("a/b".to_string()),
        };
        assert_eq!(found.stars_label(), "10");
        assert_eq!(found.forks_label(), "2");
        assert!(found.is_found());

        let missing = RepoStats::NotFound { url: "https://github.com/search?q=x".to_string() };
        assert_eq!(missing.stars_label(), "not found");
        assert_eq!(missing.url(), "https://github.com/search?q=x");

        let failed = RepoStats::FetchError { url: "u".to_string() };
        assert_eq!(failed.forks_label(), "fetch failed");
        assert!(!failed.is_found());
    }

    #[test]
    fn test_repo_stats_serializes_tagged() {
        let value = serde_json::to_value(RepoStats::NotFound { url: "u".to_string() }).unwrap();
        assert_eq!(value["status"], "not_found");
        assert_eq!(value["url"], "u");
    }
}
