//! HTTP server for the company research page
//!
//! Serves the search form, runs one lookup per form submission and renders
//! the result as a single HTML page.

pub mod pages;
pub mod state;

pub use pages::ResearchForm;
pub use state::ServerAppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the router with all routes
pub fn build_router(state: ServerAppState) -> Router {
    Router::new()
        .route("/", get(pages::index_handler))
        .route("/research", post(pages::research_handler))
        .route("/health", get(pages::health_handler))
        .with_state(state)
}

/// Run the HTTP server until shutdown is requested
pub async fn run_server(port: u16, bind: &str, state: ServerAppState) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let shutdown_state = state.shutdown_state.clone();
    let app = build_router(state);

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Company Research Agent                     ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║                                                              ║");
    println!("║  Open: http://{:<47}║", addr);
    println!("║                                                              ║");
    println!("║  Endpoints:                                                  ║");
    println!("║    GET  /                - Search form                       ║");
    println!("║    POST /research        - Research a company                ║");
    println!("║    GET  /health          - Health check                      ║");
    println!("║                                                              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("[server] Listening on http://{}", addr);

    // Create shutdown signal that waits for the shutdown state flag
    let shutdown_signal = async move {
        loop {
            if shutdown_state.is_shutdown_requested() {
                log::info!("[server] Shutdown signal received, stopping server...");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}
