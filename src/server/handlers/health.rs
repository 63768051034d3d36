//! Liveness and database health handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::server::types::{DbDownResponse, DbHealthResponse, HealthResponse};
use crate::server::AppState;
use crate::model::StorageError;
use crate::storage::{DbHealth, PriceSink};
use crate::utils::timestamp_now;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Sistema de precios activo.",
        database: "Not checked",
        timestamp: timestamp_now(),
    })
}

/// Opens a connection, runs one query, and closes it again.
pub async fn db_health_handler(State(state): State<AppState>) -> Response {
    match check_database(state.sink.as_ref()).await {
        Ok(health) => Json(DbHealthResponse {
            status: "Connected",
            database: health.database,
            server: health.server,
            current_time: health.current_time,
            timestamp: timestamp_now(),
        })
        .into_response(),
        Err(e) => {
            error!("❌ Database health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbDownResponse {
                    status: "Disconnected",
                    error: e.to_string(),
                    timestamp: timestamp_now(),
                }),
            )
                .into_response()
        }
    }
}

async fn check_database(sink: &dyn PriceSink) -> Result<DbHealth, StorageError> {
    let lease = sink.acquire()?;
    tokio::task::spawn_blocking(move || {
        let health = lease.ping();
        if let Err(e) = lease.release() {
            warn!("Error closing database connection: {}", e);
        }
        health
    })
    .await?
}
