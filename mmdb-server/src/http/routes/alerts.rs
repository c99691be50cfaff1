//! Alert endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use mmdb_core::{Alert, NewAlert};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, WindowSecs};
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAlertRequest {
    pub title: String,
    pub body: String,
}

/// POST /alerts/create
async fn create_alert(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateAlertRequest>,
) -> Result<Json<Alert>, ApiError> {
    let alert = state
        .records
        .alerts
        .create(NewAlert::new(req.title, req.body))
        .await?;
    Ok(Json(alert))
}

/// GET /alerts/all
async fn list_alerts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Alert>>, ApiError> {
    Ok(Json(state.records.alerts.list().await?))
}

/// GET /alerts/recent - window as `{"minutes": N}` or `?minutes=N`
async fn recent_alerts(
    State(state): State<Arc<AppState>>,
    WindowSecs(window): WindowSecs,
) -> Result<Json<Vec<Alert>>, ApiError> {
    Ok(Json(state.records.alerts.recent(window).await?))
}

/// Alert routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/alerts/create", post(create_alert))
        .route("/alerts/all", get(list_alerts))
        .route("/alerts/recent", get(recent_alerts))
}
