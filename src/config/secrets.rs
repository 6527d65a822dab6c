// API credentials for the research agent
//
// Both credentials are read once at process start from the environment
// (a .env file is loaded beforehand by main). Missing either is fatal.

use super::ConfigError;
use std::fmt;

/// Environment variable holding the language model API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the search provider API key
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";

/// Credentials required by the research agent
#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub tavily_api_key: String,
}

impl Secrets {
    /// Read both credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both credentials through `lookup`, treating blank values as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        let secrets = Self {
            openai_api_key: read(OPENAI_API_KEY)?,
            tavily_api_key: read(TAVILY_API_KEY)?,
        };
        log::info!("[config] Loaded API credentials from environment");
        Ok(secrets)
    }
}

// Keys must never end up in logs
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &"<redacted>")
            .field("tavily_api_key", &"<redacted>")
            .finish()
    }
}
