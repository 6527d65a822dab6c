//! Page handlers: search form, research results, health check

use super::ServerAppState;
use crate::lookup::{lookup_company, ErrorKind, LookupError};
use crate::render::{FormValues, PageView};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use uuid::Uuid;

/// Fields posted by the search form
#[derive(Debug, Default, Deserialize)]
pub struct ResearchForm {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// HTTP status for a failed lookup
pub fn status_for(err: &LookupError) -> StatusCode {
    match err.kind() {
        ErrorKind::Input => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Retrieval | ErrorKind::Validation => StatusCode::BAD_GATEWAY,
    }
}

fn render(state: &ServerAppState, status: StatusCode, page: &PageView) -> Response {
    match state.templates.render_page(page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            log::error!("[server] Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// `GET /`: the empty search form
pub async fn index_handler(State(state): State<ServerAppState>) -> Response {
    render(&state, StatusCode::OK, &PageView::blank())
}

/// `POST /research`: run one lookup and show the profile or an error panel
pub async fn research_handler(
    State(state): State<ServerAppState>,
    Form(form): Form<ResearchForm>,
) -> Response {
    let request_id = Uuid::new_v4();
    log::info!(
        "[server] Research request {} for '{}'",
        request_id,
        form.company.trim()
    );

    let result = lookup_company(
        &state.client,
        request_id,
        &form.company,
        form.country.as_deref(),
    )
    .await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e),
    };
    let values = FormValues {
        company: form.company,
        country: form.country.unwrap_or_default(),
    };
    let page = PageView::for_lookup(values, &result, request_id);
    render(&state, status, &page)
}

/// Health check endpoint
pub async fn health_handler() -> &'static str {
    "OK"
}
