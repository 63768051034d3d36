//! Price collection handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::server::types::{CollectionResponse, ErrorResponse};
use crate::server::AppState;
use crate::collector::CollectionOrchestrator;
use crate::model::CollectionError;
use crate::utils::timestamp_now;

/// Runs a full collection. Overlapping requests wait for the running one.
pub async fn collect_prices_handler(State(state): State<AppState>) -> Response {
    let _running = state.run_lock.lock().await;

    let orchestrator = CollectionOrchestrator::new(
        state.upstream.as_ref(),
        state.sink.as_ref(),
        &state.config.filters,
    );

    match orchestrator.run().await {
        Ok(summary) => {
            info!("Proceso de recolección completado: {:?}", summary);
            Json(CollectionResponse {
                success: true,
                message: "Proceso de recolección de precios completado",
                summary,
                timestamp: timestamp_now(),
            })
            .into_response()
        }
        Err(e @ CollectionError::NoCategories) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::timestamped(e.to_string())),
        )
            .into_response(),
        Err(e) => {
            error!("Error recolectando precios: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::timestamped(e.to_string())),
            )
                .into_response()
        }
    }
}
