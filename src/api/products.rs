//! Product routes - CRUD plus stock adjustments and the per-product ledger.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use sea_orm::TransactionTrait;
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiError, AppState};
use crate::core::{
    product::{self, NewProduct, ProductChanges},
    stock,
};
use crate::entities::StockOperation;
use crate::errors::Error;

/// Body of `PUT /products/:id/stock`.
#[derive(Debug, Deserialize)]
pub struct StockUpdateRequest {
    /// Units to add or remove
    pub quantity: i32,
    /// `ADD`, `SUBTRACT` or `SALE`
    pub operation: StockOperation,
}

/// Product routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/stock", put(update_product_stock))
        .route("/products/:id/transactions", get(list_product_transactions))
}

/// `POST /products` - 201 with the stored product; opening stock is booked as an `ADD`.
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let created = product::create_product(&txn, body).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "product": created.product,
            "transaction": created.transaction,
        })),
    ))
}

/// `GET /products/:id`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let found = product::get_product(&state.db, id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;

    Ok(Json(json!({ "product": found })))
}

/// `PUT /products/:id` - applies only the fields present in the body; never touches stock.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ProductChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let updated = product::update_product(&txn, id, body).await?;
    txn.commit().await?;

    Ok(Json(json!({
        "message": "product updated successfully",
        "product": updated,
    })))
}

/// `PUT /products/:id/stock` - 404 for an unknown product, 400 when stock is insufficient.
pub async fn update_product_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<StockUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let adjustment = stock::adjust_stock(&txn, id, body.quantity, body.operation).await?;
    txn.commit().await?;

    Ok(Json(json!({
        "message": "product stock updated successfully",
        "product": adjustment.product,
        "transaction": adjustment.transaction,
    })))
}

/// `DELETE /products/:id` - also removes the product's ledger.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    if !product::delete_product(&txn, id).await? {
        return Err(Error::ProductNotFound { id }.into());
    }
    txn.commit().await?;

    Ok(Json(json!({ "message": "product deleted successfully" })))
}

/// `GET /products/:id/transactions` - the product's ledger, oldest first.
pub async fn list_product_transactions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = stock::get_transactions_for_product(&state.db, id).await?;
    Ok(Json(json!({ "transactions": transactions })))
}
