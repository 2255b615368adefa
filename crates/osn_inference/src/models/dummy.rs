use std::fmt;
use lazy_static::lazy_static;
use osn_core::{ContentAnalyzer, ExtractionResult, Result};
use regex::Regex;

lazy_static! {
    static ref REPO_PATTERN: Regex =
        Regex::new(r"\b([A-Za-z0-9][A-Za-z0-9_.-]*/[A-Za-z0-9_.-]*[A-Za-z0-9_])").expect("valid repo pattern");
}

const TITLE_MAX_CHARS: usize = 80;

/// Offline analyzer: picks up `owner/repo` mentions and reuses the text as
/// the article. No network access.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContentAnalyzer for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn analyze(&self, text: &str) -> Result<ExtractionResult> {
        let mut projects: Vec<String> = Vec::new();
        for capture in REPO_PATTERN.captures_iter(text) {
            let name = capture[1].to_string();
            if !projects.contains(&name) {
                projects.push(name);
            }
        }

        let title = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| line.chars().take(TITLE_MAX_CHARS).collect::<String>())
            .unwrap_or_default();

        Ok(ExtractionResult {
            projects,
            companies: Vec::new(),
            title,
            body: text.trim().to_string(),
        })
    }
}
