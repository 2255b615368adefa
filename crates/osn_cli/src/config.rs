use osn_core::{Error, Result};
use osn_scrapers::ResolverConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ARTICLES_DIR: &str = "articles";

/// Contents of the optional `--config` TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub articles_dir: Option<PathBuf>,
    pub analyzer: osn_inference::Config,
    pub resolver: ResolverConfig,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("Cannot read config file {}: {}", path.display(), e)))?;
                Self::parse(&raw)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}
