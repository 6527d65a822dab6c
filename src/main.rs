use clap::Parser;
use company_research_lib::config::{AppConfig, Secrets};
use company_research_lib::research::{ResearchClient, WebResearchAgent};
use company_research_lib::server::{self, ServerAppState};
use company_research_lib::shutdown::{self, ShutdownState};
use company_research_lib::templates::TemplateEngine;
use std::path::PathBuf;
use std::sync::Arc;

/// Company Research Agent - look up company registration, ownership and
/// contact details from the web
#[derive(Parser, Debug)]
#[command(name = "company-research")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, env = "COMPANY_RESEARCH_PORT", default_value = "8501")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "COMPANY_RESEARCH_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Config file (defaults to ~/.company-research/config.toml when present)
    #[arg(long, env = "COMPANY_RESEARCH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() {
    // A missing .env file is fine; variables may come from the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Set it in the environment or in a .env file and try again.");
            std::process::exit(1);
        }
    };

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "[config] Using model {} with up to {} search results",
        config.research.model,
        config.research.max_search_results
    );

    let agent = match WebResearchAgent::from_settings(&config.research, &secrets) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("Error: failed to set up the research agent: {}", e);
            std::process::exit(1);
        }
    };

    let templates = match TemplateEngine::new() {
        Ok(templates) => templates,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        // Initialize shutdown state
        let shutdown_state = ShutdownState::new();
        if let Err(e) = shutdown::register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        let client = ResearchClient::new(Arc::new(agent));
        let state = ServerAppState::new(client, templates, shutdown_state);

        // Run the server
        if let Err(e) = server::run_server(cli.port, &cli.bind, state).await {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        log::info!("[server] Stopped");
    });
}
