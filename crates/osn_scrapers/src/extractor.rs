use osn_core::{Error, Result};
use scraper::{Html, Selector};

pub const STARS_SELECTOR: &str = r#"a[href$="/stargazers"] > strong"#;
pub const FORKS_SELECTOR: &str = r#"a[href$="/forks"] > strong"#;
pub const SEARCH_RESULT_SELECTOR: &str = ".search-title a:first-child";

/// Value reported for a counter that is not on the page.
pub const MISSING_COUNT: &str = "0";

/// Pulls counters and search hits out of code-host markup. Kept separate
/// from resolution so selectors can change with the host's markup.
pub trait CountExtractor: Send + Sync {
    /// `(stars, forks)`, with thousands separators removed.
    fn extract_counts(&self, markup: &str) -> (String, String);

    /// `href` of the first repository link on a search-result page.
    fn first_result(&self, markup: &str) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct SelectorCountExtractor {
    stars: Selector,
    forks: Selector,
    search_result: Selector,
}

impl SelectorCountExtractor {
    pub fn new(stars: &str, forks: &str, search_result: &str) -> Result<Self> {
        Ok(Self {
            stars: parse_selector(stars)?,
            forks: parse_selector(forks)?,
            search_result: parse_selector(search_result)?,
        })
    }

    fn count(&self, document: &Html, selector: &Selector) -> String {
        document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().replace(',', ""))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| MISSING_COUNT.to_string())
    }
}

impl Default for SelectorCountExtractor {
    fn default() -> Self {
        Self::new(STARS_SELECTOR, FORKS_SELECTOR, SEARCH_RESULT_SELECTOR)
            .expect("built-in selectors are valid")
    }
}

impl CountExtractor for SelectorCountExtractor {
    fn extract_counts(&self, markup: &str) -> (String, String) {
        let document = Html::parse_document(markup);
        (self.count(&document, &self.stars), self.count(&document, &self.forks))
    }

    fn first_result(&self, markup: &str) -> Option<String> {
        let document = Html::parse_document(markup);
        document
            .select(&self.search_result)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Scraping(format!("Invalid selector {:?}: {}", selector, e)))
}
