// Main entry point - Dependency injection and event loop setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dispatcher::Dispatcher;
use crate::application::session::Session;
use crate::infrastructure::config::load_client_config;
use crate::infrastructure::websocket::WsConnection;
use crate::presentation::console_surface::ConsoleSurface;
use crate::presentation::progress::ConsoleProgress;
use crate::presentation::user_input::stdin_input;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration, the first argument overrides the endpoint
    let mut config = load_client_config().context("failed to load client configuration")?;
    if let Some(endpoint) = std::env::args().nth(1) {
        config.endpoint = endpoint;
    }

    // Connect (infrastructure layer)
    let connection = WsConnection::connect(&config.endpoint)
        .await
        .with_context(|| format!("failed to connect to {}", config.endpoint))?;

    // Session and views (application layer) committing to the console (presentation layer)
    let mut session = Session::new(&config, ConsoleSurface::default(), ConsoleProgress::default());
    let mut dispatcher = Dispatcher::new(connection, config.topology.layout_period());

    dispatcher
        .run(&mut session, Box::pin(stdin_input()))
        .await?;

    Ok(())
}
