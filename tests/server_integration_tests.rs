// Integration tests for the HTTP front-end
// The research agent is mocked, so no network access or API keys are needed

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use company_research_lib::research::{ResearchAgent, ResearchClient, ResearchError, ResearchRequest};
use company_research_lib::server::{build_router, ServerAppState};
use company_research_lib::shutdown::ShutdownState;
use company_research_lib::templates::TemplateEngine;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const PLACEHOLDER: &str = "Information not available";

/// Agent that always returns the same reply and counts how often it is asked
struct MockAgent {
    reply: Result<Value, fn() -> ResearchError>,
    calls: AtomicUsize,
}

#[async_trait]
impl ResearchAgent for MockAgent {
    async fn research(&self, _request: &ResearchRequest) -> Result<Value, ResearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(value) => Ok(value.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

fn app(reply: Result<Value, fn() -> ResearchError>) -> (Router, Arc<MockAgent>) {
    let agent = Arc::new(MockAgent {
        reply,
        calls: AtomicUsize::new(0),
    });
    let state = ServerAppState::new(
        ResearchClient::new(agent.clone()),
        TemplateEngine::new().unwrap(),
        ShutdownState::new(),
    );
    (build_router(state), agent)
}

async fn post_research(router: Router, form: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/research")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn full_profile() -> Value {
    json!({
        "legal_name": "Acme Corporation",
        "general_details": "Maker of anvils.",
        "primary_address": "1 Desert Road",
        "town": "Phoenix",
        "country": "United States",
        "legal_form": "Corporation",
        "registration_number": "C123456",
        "registration_date": "1949-09-17",
        "contact_information": {
            "email": "info@acme.example",
            "phone": "+1 555 0100",
            "website": "https://acme.example"
        },
        "directors": ["Jane Doe", "John Roe"],
        "shareholders": ["Acme Holdings"],
        "ubo": "Jane Doe",
        "parent_company": "Acme Holdings",
        "subsidiaries": "Acme Rockets LLC",
        "last_reported_revenue": "USD 12.5m (2023)",
        "references": ["https://acme.example"]
    })
}

#[tokio::test]
async fn test_index_shows_form() {
    let (router, agent) = app(Ok(full_profile()));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<form method=\"post\" action=\"/research\">"));
    assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_health() {
    let (router, _) = app(Ok(full_profile()));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_acme_scenario() {
    let (router, agent) = app(Ok(json!({
        "legal_name": "Acme Corporation",
        "directors": ["Jane Doe"],
        "references": ["http://example.com"]
    })));

    let (status, html) = post_research(router, "company=Acme+Corp").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent.calls.load(Ordering::SeqCst), 1);

    assert!(html.contains("<h2>Acme Corporation</h2>"));
    assert_eq!(html.matches("<tr class=\"row\">").count(), 1);
    assert!(html.contains("<td>Jane Doe</td>"));
    assert_eq!(html.matches("class=\"reference\"").count(), 1);
    assert!(html.contains(">example.com</a>"));

    // Summary, five contact rows, eight registration rows and the shareholder table
    assert_eq!(html.matches(PLACEHOLDER).count(), 15);
    assert!(!html.contains("class=\"error-panel\""));
}

#[tokio::test]
async fn test_full_profile_has_no_placeholders() {
    let (router, _) = app(Ok(full_profile()));
    let (status, html) = post_research(router, "company=Acme&country=United+States").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains(PLACEHOLDER));
    assert_eq!(html.matches("<tr class=\"row\">").count(), 3);
    assert!(html.contains("value=\"United States\""));
}

#[tokio::test]
async fn test_blank_company_makes_no_agent_call() {
    let (router, agent) = app(Ok(full_profile()));
    let (status, html) = post_research(router, "company=++++&country=").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    assert_eq!(html.matches("class=\"error-panel\"").count(), 1);
    assert!(html.contains("InputError"));
}

#[tokio::test]
async fn test_missing_company_field_is_input_error() {
    let (router, agent) = app(Ok(full_profile()));
    let (status, _) = post_research(router, "country=France").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_bare_string_shows_single_error_panel() {
    let (router, _) = app(Ok(json!("Acme is a company in Arizona.")));
    let (status, html) = post_research(router, "company=Acme").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(html.matches("class=\"error-panel\"").count(), 1);
    assert!(html.contains("ValidationError"));
    assert!(!html.contains("<table"));
    assert!(!html.contains("class=\"section\""));
}

#[tokio::test]
async fn test_not_found_reply() {
    let (router, _) = app(Ok(json!({"found": false})));
    let (status, html) = post_research(router, "company=Nonexistent+Widgets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Company not found"));
}

#[tokio::test]
async fn test_retrieval_failure_is_bad_gateway() {
    let (router, _) = app(Err(|| ResearchError::Api {
        service: "language model",
        status: 401,
        message: "Incorrect API key provided".to_string(),
    }));
    let (status, html) = post_research(router, "company=Acme").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("RetrievalError"));
    assert!(html.contains("OPENAI_API_KEY"));
    assert!(!html.contains("<table"));
}

#[tokio::test]
async fn test_agent_values_are_escaped() {
    let (router, _) = app(Ok(json!({
        "legal_name": "<img src=x onerror=alert(1)>",
        "directors": ["<b>Jane</b>"]
    })));
    let (status, html) = post_research(router, "company=Acme").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("<img src=x"));
    assert!(!html.contains("<b>Jane</b>"));
    assert!(html.contains("&lt;b&gt;Jane"));
}
