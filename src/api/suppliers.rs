//! Supplier routes - CRUD and the supplier's product listing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use sea_orm::TransactionTrait;
use serde_json::json;

use crate::api::{ApiError, AppState};
use crate::core::supplier::{self, NewSupplier, SupplierChanges};
use crate::errors::Error;

/// Supplier routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", post(create_supplier))
        .route(
            "/suppliers/:id",
            get(get_supplier)
                .put(update_supplier)
                .delete(delete_supplier),
        )
        .route("/suppliers/:id/products", get(list_supplier_products))
}

/// `POST /suppliers` - 201 with the stored supplier, 400 on a duplicate email.
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(body): Json<NewSupplier>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let created = supplier::create_supplier(&txn, body).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(json!({ "supplier": created }))))
}

/// `GET /suppliers/:id`
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let found = supplier::get_supplier(&state.db, id)
        .await?
        .ok_or(Error::SupplierNotFound { id })?;

    Ok(Json(json!({ "supplier": found })))
}

/// `PUT /suppliers/:id` - applies only the fields present in the body.
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SupplierChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let updated = supplier::update_supplier(&txn, id, body).await?;
    txn.commit().await?;

    Ok(Json(json!({
        "message": "Supplier updated successfully",
        "supplier": updated,
    })))
}

/// `DELETE /suppliers/:id` - also removes the supplier's products and their ledgers.
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    if !supplier::delete_supplier(&txn, id).await? {
        return Err(Error::SupplierNotFound { id }.into());
    }
    txn.commit().await?;

    Ok(Json(json!({ "message": "Supplier deleted successfully" })))
}

/// `GET /suppliers/:id/products`
pub async fn list_supplier_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let products = supplier::get_products_for_supplier(&state.db, id).await?;
    Ok(Json(json!({ "products": products })))
}
