//! mmdb-server: HTTP/JSON API over the record access layer
//!
//! Every handler delegates to [`mmdb_core::Records`]; this crate only maps
//! requests onto record operations and errors onto responses.

pub mod http;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
