//! Server application state shared across handlers

use crate::research::ResearchClient;
use crate::shutdown::ShutdownState;
use crate::templates::TemplateEngine;
use std::sync::Arc;

/// Shared state for the server. Everything in here is read-only once the
/// server is running; each request works on its own data.
#[derive(Clone)]
pub struct ServerAppState {
    /// Research client wrapping the configured agent
    pub client: Arc<ResearchClient>,

    /// Compiled page templates
    pub templates: Arc<TemplateEngine>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    pub fn new(
        client: ResearchClient,
        templates: TemplateEngine,
        shutdown_state: ShutdownState,
    ) -> Self {
        Self {
            client: Arc::new(client),
            templates: Arc::new(templates),
            shutdown_state,
        }
    }
}
