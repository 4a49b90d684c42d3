//! Product routes: catalog listing, save and sell.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tienda_core::{Product, ProductDraft, ProductListing, Sale};

use crate::error::ApiError;
use crate::AppState;

/// Body of `POST /api/products/sell/:id`.
#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub quantity: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/save", post(save_product))
        .route("/products/sell/:id", post(sell_product))
}

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductListing>>, ApiError> {
    Ok(Json(state.db.products().list_listings().await?))
}

/// POST /api/products/save
pub async fn save_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(draft) = payload?;
    Ok(Json(state.db.products().save(&draft).await?))
}

/// POST /api/products/sell/:id
pub async fn sell_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SellRequest>, JsonRejection>,
) -> Result<Json<Sale>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let sale = state.db.sale_workflow().sell(id, request.quantity).await?;
    Ok(Json(sale))
}
