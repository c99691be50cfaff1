//! API error types with IntoResponse
//!
//! Every failure is rendered as `{"error": "<message>"}`. Record errors keep
//! the 500 status existing clients rely on; store failures are logged first.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mmdb_core::RecordError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Record access layer failure (500)
    Record(RecordError),

    /// Body was not valid JSON for the endpoint (500)
    InvalidBody(String),

    /// Method not accepted by a method-checking endpoint (400)
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Record(_) | Self::InvalidBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Record(e) => e.to_string(),
            Self::InvalidBody(reason) => format!("invalid request body: {}", reason),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Record(RecordError::Store(e)) => tracing::error!("Store error: {}", e),
            Self::Record(e) => tracing::debug!(kind = e.kind(), "{}", e),
            Self::InvalidBody(reason) => tracing::debug!("rejected body: {}", reason),
            Self::MethodNotAllowed => {}
        }

        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<RecordError> for ApiError {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use mmdb_core::StoreError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_500_with_message() {
        let response = ApiError::from(RecordError::invalid("name")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "invalid [name]"}));
    }

    #[tokio::test]
    async fn store_error_keeps_message() {
        let err = RecordError::Store(StoreError::pool("timed out"));
        let response = ApiError::from(err).into_response();
        assert_eq!(
            body_json(response).await,
            json!({"error": "connection pool error: timed out"})
        );
    }

    #[tokio::test]
    async fn method_not_allowed_is_400() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Method not allowed"}));
    }
}
