//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use mmdb_core::RecordError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

/// JSON body that ignores the content type and reports decode failures as
/// [`ApiError::InvalidBody`].
///
/// An empty body decodes as `{}`, so payload structs with defaulted fields
/// fall through to record validation.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}

/// `minutes` as sent in the body (`{"minutes": N}`) or the query string
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindowParams {
    minutes: Option<i64>,
}

/// Look-back window for the recent-records endpoints, in seconds.
///
/// The JSON body wins over `?minutes=`; neither present means a zero window.
/// An unparsable query value or an overflowing window is `invalid [window]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSecs(pub i64);

impl<S> FromRequest<S> for WindowSecs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = match req.uri().query() {
            Some(_) => {
                let Query(params) = Query::<WindowParams>::try_from_uri(req.uri())
                    .map_err(|_| RecordError::invalid("window"))?;
                params.minutes
            }
            None => None,
        };

        let JsonBody(body) = JsonBody::<WindowParams>::from_request(req, state).await?;
        let minutes = body.minutes.or(from_query).unwrap_or(0);

        minutes
            .checked_mul(60)
            .map(WindowSecs)
            .ok_or_else(|| RecordError::invalid("window").into())
    }
}
