// Chat completion client for OpenAI-compatible APIs

use super::search::upstream_message;
use super::{ResearchError, LLM_SERVICE};
use crate::config::ResearchSettings;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Shape of the completion the model should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    /// A single JSON object (`response_format: json_object`)
    Json,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one system + user exchange and return the assistant's reply
    async fn complete(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, ResearchError>;
}

/// OpenAI chat completions client
pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(client: reqwest::Client, settings: &ResearchSettings, api_key: String) -> Self {
        Self {
            client,
            base_url: settings.openai_base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        }
    }

    fn request_body(&self, system: &str, user: &str, format: ResponseFormat) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0,
        });
        if format == ResponseFormat::Json {
            body["response_format"] = json!({"type": "json_object"});
        }
        body
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, ResearchError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(system, user, format);

        log::debug!(
            "[llm] Sending completion request to {} (model {}, {:?})",
            url,
            self.model,
            format
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ResearchError::from_reqwest(LLM_SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ResearchError::Api {
                service: LLM_SERVICE,
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ResearchError::InvalidResponse {
                service: LLM_SERVICE,
                message: format!("Failed to parse response: {}", e),
            })?;

        parse_completion(&payload)
    }
}

/// Extract the assistant message from a chat completions payload
fn parse_completion(payload: &Value) -> Result<String, ResearchError> {
    let choice = &payload["choices"][0];

    if choice["finish_reason"] == "content_filter" {
        return Err(ResearchError::InvalidResponse {
            service: LLM_SERVICE,
            message: "completion was blocked by the content filter".to_string(),
        });
    }

    choice["message"]["content"]
        .as_str()
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ResearchError::InvalidResponse {
            service: LLM_SERVICE,
            message: "completion has no message content".to_string(),
        })
}
