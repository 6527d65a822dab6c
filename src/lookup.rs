// Company lookup pipeline: input -> research client -> schema validator

use crate::models::CompanyProfile;
use crate::parsers::{validate_profile, ValidationError};
use crate::research::{InputError, ResearchClient, ResearchError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Why a lookup produced no profile
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Retrieval(ResearchError),

    #[error("The research agent returned data in an unexpected shape ({0})")]
    Validation(#[from] ValidationError),

    #[error("No information found for '{company}'")]
    NotFound { company: String },
}

impl From<ResearchError> for LookupError {
    fn from(err: ResearchError) -> Self {
        match err {
            ResearchError::NotFound(company) => LookupError::NotFound { company },
            other => LookupError::Retrieval(other),
        }
    }
}

/// Error taxonomy shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Retrieval,
    Validation,
    NotFound,
}

impl ErrorKind {
    /// Taxonomy label
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Input => "InputError",
            ErrorKind::Retrieval => "RetrievalError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFound",
        }
    }

    /// Human-readable heading
    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::Input => "Invalid company name",
            ErrorKind::Retrieval => "Research failed",
            ErrorKind::Validation => "Unexpected research result",
            ErrorKind::NotFound => "Company not found",
        }
    }
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Input(_) => ErrorKind::Input,
            LookupError::Retrieval(_) => ErrorKind::Retrieval,
            LookupError::Validation(_) => ErrorKind::Validation,
            LookupError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// What the user can do about it
    pub fn suggestion(&self) -> &'static str {
        match self {
            LookupError::Input(_) => {
                "Enter the company's name, for example \"Acme Corp\", and check the spelling."
            }
            LookupError::Retrieval(err) if err.is_auth_failure() => {
                "Verify the OPENAI_API_KEY and TAVILY_API_KEY settings and restart the server."
            }
            LookupError::Retrieval(ResearchError::Api { .. }) => {
                "The research service returned an error. Try again in a moment."
            }
            LookupError::Retrieval(_) => "Check your internet connection and try again.",
            LookupError::Validation(_) => {
                "Try again, or rephrase the company name with its legal form or country."
            }
            LookupError::NotFound { .. } => {
                "Check the spelling of the company name or add the country where it is registered."
            }
        }
    }
}

/// Research one company and validate the result.
///
/// Exactly one agent call is made, and none when the input is rejected. A
/// response that validates but carries no facts at all counts as not found.
pub async fn lookup_company(
    client: &ResearchClient,
    request_id: Uuid,
    company: &str,
    country: Option<&str>,
) -> Result<CompanyProfile, LookupError> {
    let request = ResearchClient::prepare(company, country).map_err(|e| {
        log::info!("[lookup {}] Rejected input: {}", request_id, e);
        e
    })?;

    let raw = client.fetch(&request).await.map_err(|e| {
        log::warn!("[lookup {}] Research failed: {}", request_id, e);
        e
    })?;

    let profile = validate_profile(&raw).map_err(|e| {
        log::warn!("[lookup {}] Validation failed: {}", request_id, e);
        e
    })?;

    if profile.is_empty() {
        log::info!("[lookup {}] Empty profile for '{}'", request_id, request.company);
        return Err(LookupError::NotFound {
            company: request.company,
        });
    }

    log::info!(
        "[lookup {}] Profile ready for '{}' ({} directors, {} references)",
        request_id,
        request.company,
        profile.directors.len(),
        profile.references.len()
    );
    Ok(profile)
}
