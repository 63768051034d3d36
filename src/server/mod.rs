//! HTTP API for the price collector.
//!
//! Endpoints:
//! - `GET /health` - liveness, never touches the database
//! - `GET /db-health` - one connection and one query against the sink
//! - `POST /obtener-categorias-sucursal*` - filtered views of the branch taxonomy
//! - `POST /recolectar-precios` - full collection run

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::AppConfig;
use crate::scraper::UpstreamClient;
use crate::storage::PriceSink;
use handlers::{
    branch_categories_handler, category_tree_handler, collect_prices_handler, db_health_handler,
    health_handler, resolved_categories_handler,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: Arc<dyn UpstreamClient>,
    pub sink: Arc<dyn PriceSink>,
    /// Held for the whole of a collection run.
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, upstream: Arc<dyn UpstreamClient>, sink: Arc<dyn PriceSink>) -> Self {
        Self {
            config,
            upstream,
            sink,
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/db-health", get(db_health_handler))
        .route("/obtener-categorias-sucursal", post(branch_categories_handler))
        .route(
            "/obtener-categorias-sucursal-solo-categoria",
            post(category_tree_handler),
        )
        .route(
            "/obtener-categorias-sucursal-solo-categoria-y-subcategoria",
            post(resolved_categories_handler),
        )
        .route("/recolectar-precios", post(collect_prices_handler))
        .with_state(state)
}

/// Serves until Ctrl-C or SIGTERM, then drains in-flight requests.
pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

    info!("🚀 API corriendo en http://localhost:{}", port);
    info!("💡 Database connection will be established only when needed");
    info!("🔍 Use /db-health to test database connection");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("🛑 Shutdown signal received, shutting down gracefully...");
}
