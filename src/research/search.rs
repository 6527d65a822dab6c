// Web search provider (Tavily search API)

use super::{ResearchError, SEARCH_SERVICE};
use crate::config::ResearchSettings;
use crate::parsers::profile::is_http_url;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    pub url: String,
    /// Extracted page content relevant to the query
    #[serde(default)]
    pub content: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ResearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Tavily search API client
pub struct TavilySearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    search_depth: String,
    max_results: u32,
}

impl TavilySearch {
    pub fn new(client: reqwest::Client, settings: &ResearchSettings, api_key: String) -> Self {
        Self {
            client,
            endpoint: settings.search_url.clone(),
            api_key,
            search_depth: settings.search_depth.clone(),
            max_results: settings.max_search_results,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ResearchError> {
        let body = json!({
            "query": query,
            "search_depth": self.search_depth,
            "max_results": self.max_results,
            "include_answer": false,
        });

        log::debug!("[search] Searching: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ResearchError::from_reqwest(SEARCH_SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ResearchError::Api {
                service: SEARCH_SERVICE,
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        let parsed: SearchResponse =
            response
                .json()
                .await
                .map_err(|e| ResearchError::InvalidResponse {
                    service: SEARCH_SERVICE,
                    message: format!("Failed to parse response: {}", e),
                })?;

        let hits = usable_hits(parsed.results);
        log::info!("[search] {} results for: {}", hits.len(), query);
        Ok(hits)
    }
}

/// Keep hits with an http(s) URL, de-duplicated by URL
fn usable_hits(results: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = Vec::new();
    for hit in results {
        if is_http_url(&hit.url) && !hits.iter().any(|h| h.url == hit.url) {
            hits.push(hit);
        }
    }
    hits
}

/// Pull a readable message out of an upstream error body
pub(crate) fn upstream_message(body: &str) -> String {
    const MAX_LEN: usize = 200;

    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("detail").and_then(|d| d.get("error").or(Some(d))))
            .or_else(|| v.get("error"))
            .and_then(|m| m.as_str().map(str::to_string))
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.chars().count() > MAX_LEN {
        format!("{}...", message.chars().take(MAX_LEN).collect::<String>())
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::{http_client, stub_server};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn tavily(base: &str, timeout: Option<u64>) -> TavilySearch {
        let settings = ResearchSettings {
            search_url: format!("{}/search", base),
            max_search_results: 3,
            request_timeout_secs: timeout,
            ..Default::default()
        };
        TavilySearch::new(http_client(&settings).unwrap(), &settings, "tvly-test".to_string())
    }

    #[tokio::test]
    async fn test_search_against_stub_server() {
        let seen: Arc<Mutex<Option<(String, Value)>>> = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let router = Router::new().route(
            "/search",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *recorder.lock().unwrap() = Some((auth, body));
                    Json(json!({"results": [
                        {"title": "Acme", "url": "https://acme.example", "content": "Anvils."},
                        {"title": "Acme again", "url": "https://acme.example"},
                        {"title": "Local", "url": "file:///etc/passwd"}
                    ]}))
                }
            }),
        );
        let base = stub_server::serve(router).await;

        let hits = tavily(&base, None).search("Acme Corp").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "Anvils.");

        let (auth, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer tvly-test");
        assert_eq!(body["query"], "Acme Corp");
        assert_eq!(body["max_results"], 3);
        assert_eq!(body["search_depth"], "advanced");
    }

    #[tokio::test]
    async fn test_search_unauthorized_is_api_error() {
        let router = Router::new().route(
            "/search",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": {"error": "Unauthorized: missing or invalid API key."}})),
                )
            }),
        );
        let base = stub_server::serve(router).await;

        let err = tavily(&base, None).search("Acme").await.unwrap_err();
        match &err {
            ResearchError::Api {
                service,
                status,
                message,
            } => {
                assert_eq!(*service, SEARCH_SERVICE);
                assert_eq!(*status, 401);
                assert_eq!(message, "Unauthorized: missing or invalid API key.");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_search_slow_upstream_times_out() {
        let router = Router::new().route(
            "/search",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"results": []}))
            }),
        );
        let base = stub_server::serve(router).await;

        let err = tavily(&base, Some(1)).search("Acme").await.unwrap_err();
        assert!(matches!(err, ResearchError::Timeout { service } if service == SEARCH_SERVICE));
    }


    #[test]
    fn test_search_response_parsing() {
        let body = r#"{
            "query": "Acme",
            "results": [
                {"title": "Acme Corp", "url": "https://acme.example", "content": "Anvils", "score": 0.9},
                {"url": "https://registry.example/acme"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "Acme Corp");
        assert_eq!(parsed.results[1].content, "");
    }

    #[test]
    fn test_usable_hits_filters_and_dedupes() {
        let hit = |url: &str| SearchHit {
            title: String::new(),
            url: url.to_string(),
            content: String::new(),
        };
        let hits = usable_hits(vec![
            hit("https://acme.example"),
            hit("javascript:alert(1)"),
            hit("https://acme.example"),
            hit("http://registry.example"),
        ]);
        let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["https://acme.example", "http://registry.example"]);
    }

    #[test]
    fn test_upstream_message_variants() {
        assert_eq!(
            upstream_message(r#"{"error": {"message": "Incorrect API key provided"}}"#),
            "Incorrect API key provided"
        );
        assert_eq!(
            upstream_message(r#"{"detail": {"error": "Unauthorized: missing or invalid API key."}}"#),
            "Unauthorized: missing or invalid API key."
        );
        assert_eq!(upstream_message("Bad Gateway"), "Bad Gateway");
        assert!(upstream_message(&"x".repeat(500)).ends_with("..."));
    }
}
