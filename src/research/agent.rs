// Web research agent - search, cited report, structured extraction

use super::llm::{ChatModel, OpenAiChat, ResponseFormat};
use super::prompts;
use super::search::{SearchHit, SearchProvider, TavilySearch};
use super::{http_client, ResearchAgent, ResearchError, ResearchRequest};
use crate::config::{ResearchSettings, Secrets};
use crate::parsers::{split_report, ResearchReport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Research agent backed by a search provider and a chat model
pub struct WebResearchAgent {
    search: Arc<dyn SearchProvider>,
    model: Arc<dyn ChatModel>,
}

impl WebResearchAgent {
    pub fn new(search: Arc<dyn SearchProvider>, model: Arc<dyn ChatModel>) -> Self {
        Self { search, model }
    }

    /// Build the production agent (Tavily search + OpenAI chat)
    pub fn from_settings(settings: &ResearchSettings, secrets: &Secrets) -> Result<Self, ResearchError> {
        let client = http_client(settings)?;
        let search = TavilySearch::new(client.clone(), settings, secrets.tavily_api_key.clone());
        let model = OpenAiChat::new(client, settings, secrets.openai_api_key.clone());
        Ok(Self::new(Arc::new(search), Arc::new(model)))
    }
}

#[async_trait]
impl ResearchAgent for WebResearchAgent {
    async fn research(&self, request: &ResearchRequest) -> Result<Value, ResearchError> {
        let hits = self.search.search(&request.search_query()).await?;
        if hits.is_empty() {
            return Err(ResearchError::NotFound(request.company.clone()));
        }

        let report_text = self
            .model
            .complete(
                prompts::REPORT_SYSTEM_PROMPT,
                &prompts::report_prompt(&request.query, &hits),
                ResponseFormat::Text,
            )
            .await?;
        let report = split_report(&report_text);
        log::debug!(
            "[research] Report for '{}': {} chars, {} citations",
            request.company,
            report.body.len(),
            report.citations.len()
        );

        let extraction = self
            .model
            .complete(
                prompts::EXTRACTION_SYSTEM_PROMPT,
                &prompts::extraction_prompt(&request.company, &report.body, &report.source_list()),
                ResponseFormat::Json,
            )
            .await?;

        // Leave unparsable output to the validator, which reports it properly
        let mut output = serde_json::from_str::<Value>(&extraction)
            .unwrap_or_else(|_| Value::String(extraction));
        attach_references(&mut output, &report, &hits);
        Ok(output)
    }
}

/// Fill in references when the extraction left them out: report citations
/// first, search hit URLs otherwise
fn attach_references(output: &mut Value, report: &ResearchReport, hits: &[SearchHit]) {
    let Value::Object(object) = output else {
        return;
    };
    if object.get("found") == Some(&Value::Bool(false)) {
        return;
    }

    let has_references = match object.get("references") {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(text)) => !text.trim().is_empty(),
        _ => false,
    };
    if has_references {
        return;
    }

    let urls: Vec<String> = if report.citations.is_empty() {
        hits.iter().map(|hit| hit.url.clone()).collect()
    } else {
        report.urls()
    };
    object.insert("references".to_string(), json!(urls));
}
