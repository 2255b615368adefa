use clap::Parser;
use osn_core::Result;
use osn_scrapers::logging::init_logging;
use osn_scrapers::{ArticleCommands, CurationManager, GithubResolver};
use osn_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;

use config::{FileConfig, DEFAULT_ARTICLES_DIR};

/// `--timeout` accepts humantime spans (`30s`, `1m 30s`, `2min`) or a bare
/// number of seconds. Zero is rejected.
fn parse_timeout(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    let duration = match s.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(s).map_err(|e| format!("Invalid duration '{}': {}", s, e))?,
    };
    if duration.is_zero() {
        return Err("Timeout must be greater than zero".to_string());
    }
    Ok(duration)
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn pasted text into open-source project news", long_about = None)]
pub struct Cli {
    /// Directory holding saved articles
    #[arg(long, env = "OSN_ARTICLES_DIR")]
    articles_dir: Option<PathBuf>,
    /// Storage backend: markdown (default) or memory
    #[arg(long, default_value = "markdown")]
    storage: String,
    /// Analyzer to use: siliconflow (default) or dummy
    #[arg(long, default_value = "siliconflow")]
    model: String,
    /// API key for the language-model endpoint
    #[arg(long, env = "OSN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// TOML file with [analyzer] and [resolver] settings
    #[arg(long, env = "OSN_CONFIG")]
    config: Option<PathBuf>,
    /// Base URL of the code-hosting site
    #[arg(long)]
    github_url: Option<String>,
    /// Timeout for every outbound request (e.g. 30s, 1m)
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the web interface
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
    #[command(flatten)]
    Article(ArticleCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    let mut file_config = FileConfig::load(cli.config.as_deref())?;
    if let Some(key) = cli.api_key.clone() {
        file_config.analyzer.api_key = Some(key);
    }
    if let Some(url) = cli.github_url.clone() {
        file_config.resolver.base_url = url;
    }
    if let Some(timeout) = cli.timeout {
        // sub-second spans clamp to one second
        let secs = timeout.as_secs().max(1);
        file_config.analyzer.timeout_secs = secs;
        file_config.resolver.timeout_secs = secs;
    }
    let articles_dir = cli
        .articles_dir
        .clone()
        .or(file_config.articles_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTICLES_DIR));

    let storage = osn_storage::create_storage(&cli.storage, &articles_dir).await?;
    info!("💾 Storage initialized (using {} at {})", cli.storage, articles_dir.display());

    let analyzer = osn_inference::create_model(&cli.model, file_config.analyzer)?;
    info!("🧠 Analyzer initialized (using {})", analyzer.name());

    let resolver = GithubResolver::new(file_config.resolver)?;
    let manager = CurationManager::new(analyzer, Arc::new(resolver), storage);

    match cli.command {
        Commands::Serve { addr } => {
            osn_web::serve(AppState { manager: Arc::new(manager) }, addr).await?;
        }
        Commands::Article(command) => {
            osn_scrapers::handle_command(command, &manager).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_timeout("1m 30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_timeout("45").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_timeout("1h").unwrap(), Duration::from_secs(3600));
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("0s").is_err());
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("5x").is_err());
        assert!(parse_timeout("abc").is_err());
    }

    #[test]
    fn test_parse_timeout_overflow_is_error() {
        assert!(parse_timeout("9999999999999999h").is_err());
        assert!(parse_timeout("99999999999999999999999").is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["osn", "--model", "dummy", "resolve", "ollama", "foo/bar"]).unwrap();
        assert_eq!(cli.model, "dummy");
        match cli.command {
            Commands::Article(ArticleCommands::Resolve { names }) => assert_eq!(names, vec!["ollama", "foo/bar"]),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["osn", "--timeout", "1m", "serve", "--addr", "0.0.0.0:9000"]).unwrap();
        assert_eq!(cli.timeout, Some(Duration::from_secs(60)));
        assert!(matches!(cli.command, Commands::Serve { .. }));

        let cli = Cli::try_parse_from(["osn", "list", "--search", "rust"]).unwrap();
        assert!(matches!(cli.command, Commands::Article(ArticleCommands::List { search: Some(_) })));
    }
}
