//! Reorder routes.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tienda_core::ReorderRecord;

use crate::error::ApiError;
use crate::AppState;

/// Query string of `GET /api/reorders`.
#[derive(Debug, Default, Deserialize)]
pub struct ReorderFilter {
    /// Only PENDING records when true.
    #[serde(default)]
    pub pending: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reorders", get(list_reorders))
        .route("/reorders/:id/complete", post(complete_reorder))
}

/// GET /api/reorders[?pending=true]
pub async fn list_reorders(
    State(state): State<AppState>,
    Query(filter): Query<ReorderFilter>,
) -> Result<Json<Vec<ReorderRecord>>, ApiError> {
    let repo = state.db.reorders();
    let records = if filter.pending {
        repo.list_pending().await?
    } else {
        repo.list_all().await?
    };
    Ok(Json(records))
}

/// POST /api/reorders/:id/complete
pub async fn complete_reorder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReorderRecord>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.reorders().complete(id).await?))
}
