//! Taxonomy listing handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::server::types::{CategorySummary, CategoryTree, DataResponse, ErrorResponse};
use crate::server::AppState;
use crate::collector::taxonomy::select_categories;
use crate::config::FilterSpec;
use crate::model::{ResolvedSelection, UpstreamError};

/// Category ids and names, filtered by the configured category list.
pub async fn branch_categories_handler(State(state): State<AppState>) -> Response {
    let spec = state.config.filters.category_only();
    list_categories(&state, spec, |s| CategorySummary::from(s)).await
}

/// Categories with their subcategories, filtered by the configured category list.
pub async fn category_tree_handler(State(state): State<AppState>) -> Response {
    let spec = state.config.filters.category_only();
    list_categories(&state, spec, |s| CategoryTree::from(s)).await
}

/// The selection a collection run would use, honouring every filter mode.
pub async fn resolved_categories_handler(State(state): State<AppState>) -> Response {
    let spec = state.config.filters.active();
    list_categories(&state, spec, ResolvedSelection::clone).await
}

async fn list_categories<T, F>(state: &AppState, spec: FilterSpec<'_>, view: F) -> Response
where
    T: Serialize,
    F: Fn(&ResolvedSelection) -> T,
{
    let categories = match state.upstream.fetch_taxonomy().await {
        Ok(categories) => categories,
        Err(e) => {
            warn!("Error obteniendo categorías: {}", e);
            let message = match e {
                UpstreamError::Flagged(message) => message,
                other => other.to_string(),
            };
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(message)),
            )
                .into_response();
        }
    };

    let data: Vec<T> = select_categories(&categories, spec).iter().map(view).collect();
    Json(DataResponse::new(data)).into_response()
}
