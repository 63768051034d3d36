mod collector;
mod config;
mod model;
mod normalizer;
mod parser;
mod scraper;
mod server;
mod storage;
mod utils;

use config::AppConfig;
use scraper::HipermaxiClient;
use server::{start_server, AppState};
use std::sync::Arc;
use storage::SqliteSink;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from the environment
    let config: Arc<AppConfig> = match AppConfig::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };
    info!(
        "Upstream {} (market {}, branch {}), page size {}",
        config.upstream.base_url,
        config.upstream.market_id,
        config.upstream.branch_id,
        config.upstream.page_size
    );
    info!("Active filter: {:?}", config.filters.active());

    let upstream = match HipermaxiClient::new(&config.upstream) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    // Connections are opened per request, never at startup
    let sink = SqliteSink::new(config.database.path.clone());

    let state = AppState::new(config.clone(), Arc::new(upstream), Arc::new(sink));
    if let Err(e) = start_server(config.port, state).await {
        error!("Server error: {}", e);
        return;
    }
    info!("🔌 Server closed");
}
