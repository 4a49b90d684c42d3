use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tienda_core::SalesStatistics;

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/statistics", get(get_statistics))
}

/// GET /api/statistics
pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<SalesStatistics>, ApiError> {
    Ok(Json(state.db.statistics().snapshot().await?))
}
