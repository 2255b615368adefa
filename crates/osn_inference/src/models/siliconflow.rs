use async_trait::async_trait;
use osn_core::{ContentAnalyzer, Error, ExtractionResult, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prompt::PromptTemplate;
use crate::{parse_extraction, Config};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    max_tokens: u32,
    stop: &'a [String],
    temperature: f32,
    top_p: f32,
    top_k: u32,
    frequency_penalty: f32,
    n: u32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Analyzer backed by an OpenAI-compatible `/chat/completions` endpoint
/// (SiliconFlow by default).
pub struct SiliconFlowModel {
    client: Client,
    config: Config,
    api_key: String,
    prompt: PromptTemplate,
}

impl SiliconFlowModel {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("SiliconFlow API key is required (set OSN_API_KEY)".to_string()))?;
        let prompt = PromptTemplate::new(&config.prompt_template)?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config, api_key, prompt })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for SiliconFlowModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiliconFlowModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.config.model_name)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[async_trait]
impl ContentAnalyzer for SiliconFlowModel {
    fn name(&self) -> &str {
        "SiliconFlow"
    }

    async fn analyze(&self, text: &str) -> Result<ExtractionResult> {
        let request = ChatRequest {
            model: &self.config.model_name,
            messages: vec![ChatMessage {
                role: "user",
                content: self.prompt.render(text)?,
            }],
            stream: false,
            max_tokens: self.config.max_tokens,
            stop: &self.config.stop,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: self.config.top_k,
            frequency_penalty: self.config.frequency_penalty,
            n: 1,
            response_format: ResponseFormat { kind: "json_object" },
        };

        tracing::debug!("Sending {} chars to {} ({})", text.len(), self.endpoint(), self.config.model_name);
        let response = self.client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!("{} - {}", status.as_u16(), body)));
        }

        let response = response.json::<ChatResponse>().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("Completion contained no choices".to_string()))?;

        Ok(parse_extraction(&content))
    }
}
