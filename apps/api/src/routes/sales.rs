//! Sales ledger routes.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tienda_core::Sale;

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales))
        .route("/sales/:id", get(get_sale).delete(delete_sale))
}

/// GET /api/sales - newest first
pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<Sale>>, ApiError> {
    Ok(Json(state.db.sales().list_all().await?))
}

/// GET /api/sales/:id
pub async fn get_sale(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Sale>, ApiError> {
    let Path(id) = id?;
    state
        .db
        .sales()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

/// DELETE /api/sales/:id
pub async fn delete_sale(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.sales().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
