pub mod aliases;
pub mod cli;
pub mod extractor;
pub mod github;
pub mod logging;
pub mod manager;
pub mod normalizer;

pub use cli::{handle_command, ArticleCommands};
pub use extractor::{CountExtractor, SelectorCountExtractor};
pub use github::{GithubResolver, ResolverConfig};
pub use manager::{Analysis, CurationManager, CurationOutcome};
pub use normalizer::normalize_name;

pub mod prelude {
    pub use super::github::{GithubResolver, ResolverConfig};
    pub use super::manager::CurationManager;
    pub use osn_core::{Article, Error, RepoStats, RepoStatsSource, Result};
}
