//! Transaction endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use mmdb_core::{NewTransaction, Transaction};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, WindowSecs};
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTransactionRequest {
    pub item: String,
    pub code: String,
}

/// POST /txn/create
async fn create_transaction(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let txn = state
        .records
        .transactions
        .create(NewTransaction::new(req.item, req.code))
        .await?;
    Ok(Json(txn))
}

/// GET /txn/getall
async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.records.transactions.list().await?))
}

/// GET /txn/recent - window as `{"minutes": N}` or `?minutes=N`
async fn recent_transactions(
    State(state): State<Arc<AppState>>,
    WindowSecs(window): WindowSecs,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.records.transactions.recent(window).await?))
}

/// Transaction routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/txn/create", post(create_transaction))
        .route("/txn/getall", get(list_transactions))
        .route("/txn/recent", get(recent_transactions))
}
