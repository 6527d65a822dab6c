//! Company research
//!
//! The [`ResearchClient`] validates the user's input and issues exactly one
//! call to a [`ResearchAgent`]. [`WebResearchAgent`] is the production agent:
//! it searches the web, has a language model write a cited report, then
//! extracts the company profile from that report as JSON.

pub mod agent;
pub mod client;
pub mod llm;
pub mod prompts;
pub mod search;

pub use agent::WebResearchAgent;
pub use client::{InputError, ResearchClient, MAX_COMPANY_NAME_LEN};
pub use llm::{ChatModel, OpenAiChat, ResponseFormat};
pub use search::{SearchHit, SearchProvider, TavilySearch};

use crate::config::ResearchSettings;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Upstream service names used in error messages
pub const SEARCH_SERVICE: &str = "search provider";
pub const LLM_SERVICE: &str = "language model";

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("No information found for '{0}'")]
    NotFound(String),

    #[error("Request to {service} failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },

    #[error("Request to {service} timed out")]
    Timeout { service: &'static str },

    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {service}: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

impl ResearchError {
    /// Map a transport error, keeping timeouts distinct
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResearchError::Timeout { service }
        } else {
            ResearchError::Request {
                service,
                message: err.to_string(),
            }
        }
    }

    /// True when the upstream rejected our credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ResearchError::Api { status: 401 | 403, .. })
    }
}

/// A validated research request for one company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    /// Normalized company name
    pub company: String,
    /// Optional country to narrow the research
    pub country: Option<String>,
    /// Full research question handed to the language model
    pub query: String,
}

impl ResearchRequest {
    /// Short keyword query for the search provider
    pub fn search_query(&self) -> String {
        match &self.country {
            Some(country) => format!(
                "{} company {} registration number address directors shareholders",
                self.company, country
            ),
            None => format!(
                "{} company registration number address directors shareholders",
                self.company
            ),
        }
    }
}

/// Build the research question for a company, optionally scoped to a country
pub fn build_query(company: &str, country: Option<&str>) -> String {
    const FIELDS: &str = "registration number, primary address, legal form, country, town, \
        registration date, contact info, general details, UBO, directors, shareholders, \
        subsidiaries, parent company, and last reported revenue";

    match country {
        Some(country) => format!(
            "Provide the {company} details specifically in {country}, including {FIELDS}. \
             Focus on the company's operations, registration number, and registration in {country}."
        ),
        None => format!(
            "Provide the {company} details, including {FIELDS}. \
             Make sure to include any company registration or identification numbers."
        ),
    }
}

/// An agent that researches a company and returns loosely-typed profile data.
///
/// Implementations return [`ResearchError::NotFound`] when they find nothing.
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    async fn research(&self, request: &ResearchRequest) -> Result<Value, ResearchError>;
}

/// Build the shared HTTP client for upstream calls
pub fn http_client(settings: &ResearchSettings) -> Result<reqwest::Client, ResearchError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("company-research/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| ResearchError::Request {
        service: "http client",
        message: format!("Failed to build client: {}", e),
    })
}
