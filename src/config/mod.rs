use crate::extractors::youtube::{DEFAULT_API_BASE_URL, MAX_PAGE_SIZE};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_path: PathBuf,
    pub api_base_url: String,
    pub timeout: u64,
    pub page_size: u32,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("videos.json"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: 30,
            page_size: MAX_PAGE_SIZE,
            user_agent: format!("video-fetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Reads a TOML config file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}
