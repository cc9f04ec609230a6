//! Ledger entry lookup by id.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::api::{ApiError, AppState};
use crate::core::stock;
use crate::errors::Error;

/// Ledger entry routes. Entries are read-only over HTTP.
pub fn router() -> Router<AppState> {
    Router::new().route("/transactions/:id", get(get_transaction))
}

/// `GET /transactions/:id`
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = stock::get_transaction(&state.db, id)
        .await?
        .ok_or(Error::TransactionNotFound { id })?;

    Ok(Json(json!({ "transaction": entry })))
}
