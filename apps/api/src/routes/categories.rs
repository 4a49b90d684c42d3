//! Category routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tienda_core::{Category, CategoryDraft};

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/save", post(save_category))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.db.categories().list_all().await?))
}

/// POST /api/categories/save
pub async fn save_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryDraft>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(draft) = payload?;
    Ok(Json(state.db.categories().save(&draft).await?))
}
