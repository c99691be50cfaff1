//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Backend serving each record kind
#[derive(Serialize)]
pub struct StoreBackends {
    pub users: &'static str,
    pub alerts: &'static str,
    pub transactions: &'static str,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stores: StoreBackends,
}

/// GET /health - liveness plus the configured backend per record kind.
/// Backends are not pinged here; `mmdb check` does that.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = &state.records;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        stores: StoreBackends {
            users: records.users.backend_name(),
            alerts: records.alerts.backend_name(),
            transactions: records.transactions.backend_name(),
        },
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
