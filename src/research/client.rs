// Research client - validates input and issues one call per lookup

use super::{build_query, ResearchAgent, ResearchError, ResearchRequest};
use crate::parsers::parse_embedded_object;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Longest company name accepted, in characters
pub const MAX_COMPANY_NAME_LEN: usize = 200;

/// Input rejected before any external call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a company name")]
    Empty,

    #[error("The company name must contain at least one letter or digit")]
    Unusable,

    #[error("The company name is longer than {max} characters")]
    TooLong { max: usize },
}

/// Issues research requests to an agent
pub struct ResearchClient {
    agent: Arc<dyn ResearchAgent>,
}

impl ResearchClient {
    pub fn new(agent: Arc<dyn ResearchAgent>) -> Self {
        Self { agent }
    }

    /// Normalize and check the form input, building the request.
    ///
    /// Whitespace is trimmed and collapsed. A blank country means no country.
    pub fn prepare(company: &str, country: Option<&str>) -> Result<ResearchRequest, InputError> {
        let company = collapse_whitespace(company);
        if company.is_empty() {
            return Err(InputError::Empty);
        }
        if !company.chars().any(char::is_alphanumeric) {
            return Err(InputError::Unusable);
        }
        if company.chars().count() > MAX_COMPANY_NAME_LEN {
            return Err(InputError::TooLong {
                max: MAX_COMPANY_NAME_LEN,
            });
        }

        let country = country
            .map(collapse_whitespace)
            .filter(|c| c.chars().any(char::is_alphanumeric));

        Ok(ResearchRequest {
            query: build_query(&company, country.as_deref()),
            company,
            country,
        })
    }

    /// Run the agent once and return its raw output.
    ///
    /// A `null` output or an object with `"found": false` means the agent
    /// knows nothing about the company. The object may also arrive wrapped
    /// in a string or a ```json fence.
    pub async fn fetch(&self, request: &ResearchRequest) -> Result<Value, ResearchError> {
        log::info!("[research] Researching '{}'", request.company);

        let output = self.agent.research(request).await?;

        if signals_not_found(&output) {
            log::info!("[research] Agent found nothing for '{}'", request.company);
            return Err(ResearchError::NotFound(request.company.clone()));
        }

        Ok(output)
    }
}

fn signals_not_found(output: &Value) -> bool {
    match output {
        Value::Null => true,
        Value::Object(object) => object.get("found") == Some(&Value::Bool(false)),
        Value::String(text) => parse_embedded_object(text)
            .is_some_and(|object| object.get("found") == Some(&Value::Bool(false))),
        _ => false,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
