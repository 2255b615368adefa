//! Instruction template sent ahead of the user's text. Templates are
//! Handlebars; the text is available as `{{text}}`.

use handlebars::Handlebars;
use osn_core::{Error, Result};
use serde::Serialize;

pub const TEXT_PLACEHOLDER: &str = "{{text}}";

const TEMPLATE_NAME: &str = "analyze";
const MARKER: &str = "\u{1f}osn-text\u{1f}";

pub const DEFAULT_TEMPLATE: &str = r#"Analyze the text below and extract:
    1. The names of the open-source projects it mentions
    2. The names of the companies it mentions
    3. A rewrite of the text as a news report (with a title and content)

    Text: {{text}}

    Reply in JSON with exactly this shape:
    {
        "projects": ["repo1", "repo2"],
        "companies": ["company1", "company2"],
        "news_title": "news title",
        "news_content": "news content"
    }"#;

#[derive(Serialize)]
struct PromptData<'a> {
    text: &'a str,
}

/// A compiled instruction template.
pub struct PromptTemplate {
    handlebars: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile `template`. It must parse, reference only `text`, and
    /// actually place the text somewhere in the prompt.
    pub fn new(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| Error::Config(format!("Invalid prompt template: {}", e)))?;

        let prompt = Self { handlebars };
        if !prompt.render(MARKER)?.contains(MARKER) {
            return Err(Error::Config(format!(
                "Prompt template must contain {}",
                TEXT_PLACEHOLDER
            )));
        }
        Ok(prompt)
    }

    pub fn render(&self, text: &str) -> Result<String> {
        self.handlebars
            .render(TEMPLATE_NAME, &PromptData { text })
            .map_err(|e| Error::Config(format!("Failed to render prompt template: {}", e)))
    }
}
