use async_trait::async_trait;
use osn_core::{RepoStats, RepoStatsSource, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::aliases::AliasTable;
use crate::extractor::{self, CountExtractor, SelectorCountExtractor, MISSING_COUNT};
use crate::normalizer::normalize_name;

pub const DEFAULT_BASE_URL: &str = "https://github.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for [`GithubResolver`], read from the `[resolver]` table of the
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub stars_selector: String,
    pub forks_selector: String,
    pub search_result_selector: String,
    /// Extra `name = "owner/repo"` aliases on top of the built-in ones.
    pub aliases: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            stars_selector: extractor::STARS_SELECTOR.to_string(),
            forks_selector: extractor::FORKS_SELECTOR.to_string(),
            search_result_selector: extractor::SEARCH_RESULT_SELECTOR.to_string(),
            aliases: BTreeMap::new(),
        }
    }
}

/// Resolves free-text project names against a GitHub-like host by scraping
/// repository and search pages.
pub struct GithubResolver {
    client: Client,
    base_url: String,
    aliases: AliasTable,
    extractor: Box<dyn CountExtractor>,
}

impl fmt::Debug for GithubResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubResolver")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl GithubResolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let extractor = SelectorCountExtractor::new(
            &config.stars_selector,
            &config.forks_selector,
            &config.search_result_selector,
        )?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            aliases: AliasTable::with_overrides(config.aliases),
            extractor: Box::new(extractor),
        })
    }

    pub fn with_extractor(mut self, extractor: Box<dyn CountExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    fn repo_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_matches('/'))
    }

    fn search_url(&self, name: &str) -> String {
        format!("{}/search?q={}&type=repositories", self.base_url, encode(name))
    }

    /// Link handed back when nothing could be resolved.
    fn fallback_url(&self, name: &str) -> String {
        format!("{}/search?q={}", self.base_url, encode(name))
    }

    fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        }
    }

    fn canonical_name(&self, url: &str) -> Option<String> {
        let path = url.strip_prefix(&self.base_url)?.trim_matches('/');
        let mut parts = path.split('/');
        match (parts.next(), parts.next()) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Some(format!("{}/{}", owner, repo))
            }
            _ => None,
        }
    }

    /// Counts from a page, or `None` unless the host answered 200.
    async fn fetch_counts(&self, url: &str) -> Result<Option<(String, String)>> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            debug!("{} answered {}", url, response.status());
            return Ok(None);
        }
        let markup = response.text().await?;
        Ok(Some(self.extractor.extract_counts(&markup)))
    }

    async fn fetch_found(&self, url: &str) -> Result<Option<RepoStats>> {
        Ok(self.fetch_counts(url).await?.and_then(|(stars, forks)| {
            if stars == MISSING_COUNT && forks == MISSING_COUNT {
                return None;
            }
            Some(RepoStats::Found {
                stars,
                forks,
                url: url.to_string(),
                canonical_name: self.canonical_name(url),
            })
        }))
    }

    async fn search_first(&self, name: &str) -> Result<Option<RepoStats>> {
        let response = self.client.get(self.search_url(name)).send().await?;
        if response.status() != StatusCode::OK {
            debug!("Search for {} answered {}", name, response.status());
            return Ok(None);
        }
        let markup = response.text().await?;
        let Some(href) = self.extractor.first_result(&markup) else {
            debug!("Search for {} returned no repositories", name);
            return Ok(None);
        };
        self.fetch_found(&self.absolute_url(&href)).await
    }

    async fn try_resolve(&self, name: &str, aliased: bool) -> Result<Option<RepoStats>> {
        if name.contains('/') {
            if let Some(stats) = self.fetch_found(&self.repo_url(name)).await? {
                return Ok(Some(stats));
            }
        }
        if aliased {
            return Ok(None);
        }
        self.search_first(name).await
    }
}

#[async_trait]
impl RepoStatsSource for GithubResolver {
    async fn resolve(&self, raw_name: &str) -> RepoStats {
        let raw_name = raw_name.trim();
        let alias = self.aliases.lookup(raw_name);
        let name = normalize_name(alias.unwrap_or(raw_name));

        // an alias is authoritative, so every outcome links to the aliased repo
        let fallback = match alias {
            Some(_) => self.repo_url(&name),
            None => self.fallback_url(&name),
        };

        if name.is_empty() {
            return RepoStats::NotFound { url: fallback };
        }

        match self.try_resolve(&name, alias.is_some()).await {
            Ok(Some(stats)) => {
                info!("⭐ {} → {} ({} stars, {} forks)", raw_name, stats.url(), stats.stars_label(), stats.forks_label());
                stats
            }
            Ok(None) => {
                info!("🔍 No repository data found for {}", raw_name);
                RepoStats::NotFound { url: fallback }
            }
            Err(e) => {
                warn!("⚠️ Failed to fetch repository data for {}: {}", raw_name, e);
                RepoStats::FetchError { url: fallback }
            }
        }
    }
}

fn encode(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_page(stars: &str, forks: &str, owner_repo: &str) -> String {
        format!(
            r#"<html><body>
                <a href="/{0}/stargazers"><strong>{1}</strong> stars</a>
                <a href="/{0}/forks"><strong>{2}</strong> forks</a>
            </body></html>"#,
            owner_repo, stars, forks
        )
    }

    fn resolver_for(server: &MockServer) -> GithubResolver {
        GithubResolver::new(ResolverConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            ..ResolverConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_direct_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foo/bar"))
            .respond_with(ResponseTemplate::new(200).set_body_string(repo_page("1,234", "56", "foo/bar")))
            .expect(1)
            .mount(&server)
            .await;

        let stats = resolver_for(&server).resolve("foo/bar").await;
        assert_eq!(
            stats,
            RepoStats::Found {
                stars: "1234".to_string(),
                forks: "56".to_string(),
                url: format!("{}/foo/bar", server.uri()),
                canonical_name: Some("foo/bar".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_alias_ignores_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ollama/ollama"))
            .respond_with(ResponseTemplate::new(200).set_body_string(repo_page("100", "10", "ollama/ollama")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/deepseek-ai/deepseek-coder"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = resolver_for(&server);
        for name in ["ollama", "Ollama", "OLLAMA "] {
            let stats = resolver.resolve(name).await;
            assert_eq!(stats.url(), format!("{}/ollama/ollama", server.uri()));
            assert!(stats.is_found());
        }

        // alias that cannot be scraped still links to the aliased repo
        let stats = resolver.resolve("DeepSeek R1").await;
        assert_eq!(
            stats,
            RepoStats::NotFound { url: format!("{}/deepseek-ai/deepseek-coder", server.uri()) }
        );
    }

    #[tokio::test]
    async fn test_search_fallback_when_direct_page_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme/widget"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>moved</body></html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "acme/widget"))
            .and(query_param("type", "repositories"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="search-title"><a href="/acme-org/widget">acme-org/widget</a></div>
                   <div class="search-title"><a href="/other/widget">other/widget</a></div>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/acme-org/widget"))
            .respond_with(ResponseTemplate::new(200).set_body_string(repo_page("42", "0", "acme-org/widget")))
            .mount(&server)
            .await;

        let stats = resolver_for(&server).resolve("acme/widget").await;
        assert_eq!(
            stats,
            RepoStats::Found {
                stars: "42".to_string(),
                forks: "0".to_string(),
                url: format!("{}/acme-org/widget", server.uri()),
                canonical_name: Some("acme-org/widget".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_bare_name_goes_straight_to_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "llama.cpp"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="search-title"><a href="/ggml-org/llama.cpp">ggml-org/llama.cpp</a></div>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ggml-org/llama.cpp"))
            .respond_with(ResponseTemplate::new(200).set_body_string(repo_page("80,000", "11,000", "ggml-org/llama.cpp")))
            .mount(&server)
            .await;

        let stats = resolver_for(&server).resolve(" llama.cpp ").await;
        assert_eq!(stats.url(), format!("{}/ggml-org/llama.cpp", server.uri()));
        assert_eq!(stats.stars_label(), "80000");
        assert_eq!(stats.forks_label(), "11000");
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>We couldn't find any repositories</p>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let stats = resolver_for(&server).resolve("no/such").await;
        assert_eq!(
            stats,
            RepoStats::NotFound { url: format!("{}/search?q=no%2Fsuch", server.uri()) }
        );
    }

    #[tokio::test]
    async fn test_empty_name_is_not_found_without_requests() {
        let server = MockServer::start().await;
        let stats = resolver_for(&server).resolve("  ?! ").await;
        assert!(matches!(stats, RepoStats::NotFound { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_fetch_error() {
        let resolver = GithubResolver::new(ResolverConfig {
            // nothing listens on port 9 (discard) locally
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ResolverConfig::default()
        })
        .unwrap();

        let stats = resolver.resolve("foo/bar").await;
        assert_eq!(
            stats,
            RepoStats::FetchError { url: "http://127.0.0.1:9/search?q=foo%2Fbar".to_string() }
        );

        let stats = resolver.resolve("some project").await;
        assert_eq!(
            stats,
            RepoStats::FetchError { url: "http://127.0.0.1:9/search?q=someproject".to_string() }
        );
    }

    #[tokio::test]
    async fn test_configured_alias() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vllm-project/vllm"))
            .respond_with(ResponseTemplate::new(200).set_body_string(repo_page("5", "1", "vllm-project/vllm")))
            .mount(&server)
            .await;

        let mut aliases = BTreeMap::new();
        aliases.insert("vLLM".to_string(), "vllm-project/vllm".to_string());
        let resolver = GithubResolver::new(ResolverConfig {
            base_url: server.uri(),
            aliases,
            ..ResolverConfig::default()
        })
        .unwrap();

        let stats = resolver.resolve("VLLM").await;
        assert_eq!(stats.url(), format!("{}/vllm-project/vllm", server.uri()));
    }
}
