// Application configuration
//
// Settings come from an optional TOML file (explicit --config path, else
// ~/.company-research/config.toml), then environment overrides, then
// defaults. Credentials live in `secrets` and are never read from the file.

mod secrets;

pub use secrets::{Secrets, OPENAI_API_KEY, TAVILY_API_KEY};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the LLM base URL
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the LLM model
pub const MODEL_ENV: &str = "COMPANY_RESEARCH_MODEL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SEARCH_URL: &str = "https://api.tavily.com/search";
const DEFAULT_SEARCH_DEPTH: &str = "advanced";
const DEFAULT_MAX_SEARCH_RESULTS: u32 = 5;
const MAX_SEARCH_RESULTS_LIMIT: u32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingSecret(&'static str),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for the research agent's upstream APIs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResearchSettings {
    /// Chat model used for the report and the extraction
    pub model: String,
    /// Base URL of the OpenAI-compatible API
    pub openai_base_url: String,
    /// Search endpoint
    pub search_url: String,
    /// Search depth passed to the search provider ("basic" or "advanced")
    pub search_depth: String,
    pub max_search_results: u32,
    /// HTTP timeout for upstream calls. Unset means no client-side timeout.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            search_depth: DEFAULT_SEARCH_DEPTH.to_string(),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            request_timeout_secs: None,
        }
    }
}

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub research: ResearchSettings,
}

impl AppConfig {
    /// Default config file location (~/.company-research/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".company-research").join("config.toml"))
    }

    /// Load configuration and apply environment overrides.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("[config] No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.normalize();
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("[config] Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(OPENAI_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.research.openai_base_url = base_url.trim().to_string();
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.research.model = model.trim().to_string();
        }
    }

    fn normalize(&mut self) {
        let research = &mut self.research;
        research.max_search_results = research.max_search_results.clamp(1, MAX_SEARCH_RESULTS_LIMIT);
        research.openai_base_url = research.openai_base_url.trim_end_matches('/').to_string();
    }
}
