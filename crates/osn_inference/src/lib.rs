use osn_core::{Error, ExtractionResult, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub mod models;
pub mod prompt;

pub use models::create_model;

pub const DEFAULT_BASE_URL: &str = "https://api.siliconflow.cn/v1";
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-72B-Instruct-128K";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Analyzer settings. Loaded from the `[analyzer]` table of the config file;
/// the API key normally comes from the environment instead.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model_name: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub frequency_penalty: f32,
    pub stop: Vec<String>,
    pub prompt_template: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.7,
            top_k: 50,
            frequency_penalty: 0.5,
            stop: vec!["<string>".to_string()],
            prompt_template: prompt::DEFAULT_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("frequency_penalty", &self.frequency_penalty)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid analyzer config: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parse a completion's text into an [`ExtractionResult`].
///
/// Anything that is not a JSON object of the expected shape degrades to an
/// empty result. A surrounding Markdown code fence is ignored.
pub fn parse_extraction(raw: &str) -> ExtractionResult {
    let trimmed = strip_code_fence(raw.trim());
    match serde_json::from_str::<ExtractionResult>(trimmed) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!("Completion is not a valid extraction payload: {}", e);
            ExtractionResult::default()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string (e.g. "json") up to the first newline
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

pub mod prelude {
    pub use super::{parse_extraction, Config};
    pub use super::models::create_model;
    pub use osn_core::{ContentAnalyzer, Error, ExtractionResult, Result};
}
