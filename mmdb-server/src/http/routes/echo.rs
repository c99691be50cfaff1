//! Connectivity test endpoints that echo their input

use std::sync::Arc;

use axum::{
    extract::Query,
    http::Method,
    routing::{any, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NameQuery {
    pub name: String,
}

impl NameQuery {
    fn name(&self) -> &str {
        if self.name.is_empty() {
            "World"
        } else {
            &self.name
        }
    }
}

/// GET /testGet?name=
async fn test_get(Query(query): Query<NameQuery>) -> Json<Value> {
    Json(json!({
        "message": format!("Hello, {}! This is a GET request.", query.name())
    }))
}

/// POST /testPost - echo the body back
async fn test_post(JsonBody(data): JsonBody<Value>) -> Json<Value> {
    Json(json!({
        "message": "Hello, World! This is a POST request.",
        "data": data
    }))
}

/// /testPut?name= - checks the method itself so other verbs get a JSON 400
async fn test_put(method: Method, Query(query): Query<NameQuery>) -> Result<Json<Value>, ApiError> {
    if method != Method::PUT {
        return Err(ApiError::MethodNotAllowed);
    }
    Ok(Json(json!({
        "message": format!("Hello, {}! This is a PUT request.", query.name())
    })))
}

/// Echo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/testGet", get(test_get))
        .route("/testPost", post(test_post))
        .route("/testPut", any(test_put))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greeting_includes_name() {
        let Json(body) = test_get(Query(NameQuery { name: "ann".into() })).await;
        assert_eq!(body["message"], "Hello, ann! This is a GET request.");

        let Json(body) = test_get(Query(NameQuery::default())).await;
        assert_eq!(body["message"], "Hello, World! This is a GET request.");
    }

    #[tokio::test]
    async fn put_handler_rejects_other_methods() {
        let result = test_put(Method::GET, Query(NameQuery::default())).await;
        assert!(matches!(result, Err(ApiError::MethodNotAllowed)));
    }
}
