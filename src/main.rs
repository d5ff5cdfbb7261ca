//! Grantsearch-RS server entry point

use anyhow::Result;
use grantsearch_rs::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    match std::env::args().nth(1).as_deref() {
        Some("-h") | Some("--help") => {
            print_usage();
            return Ok(());
        }
        Some("-V") | Some("--version") => {
            println!("grantsearch-rs {}", grantsearch_rs::VERSION);
            return Ok(());
        }
        _ => {}
    }

    // Load configuration
    let settings = config::load()?;

    // Initialize logging; debug mode lowers the default level
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting Grantsearch-RS v{}", grantsearch_rs::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.backend)?;
    info!("Search backend at {}", settings.backend.search_url);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    // Create application state and router
    let app = create_router(AppState::new(settings, client));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Grantsearch-RS v{}
Search query translation service for a grant-search portal

USAGE:
    grantsearch-rs [OPTIONS]

OPTIONS:
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    GRANTSEARCH_SETTINGS_PATH  Path to settings.yml
    GRANTSEARCH_DEBUG          Enable debug mode (true/false)
    GRANTSEARCH_PORT           Server port
    GRANTSEARCH_BIND_ADDRESS   Bind address
    GRANTSEARCH_BACKEND_URL    Search backend endpoint
    GRANTSEARCH_API_KEY        API key sent to the backend
    RUST_LOG                   Log filter (default: info, debug in debug mode)
"#,
        grantsearch_rs::VERSION
    );
}
