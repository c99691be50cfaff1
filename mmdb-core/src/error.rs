//! Structured error types for mmdb-core.
//!
//! Storage backends map their driver errors into [`StoreError`]. The record
//! access layer wraps those in [`RecordError`], whose display text is the
//! message returned to HTTP clients.

use thiserror::Error;

/// Failure inside a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Postgres or MySQL driver failure
    #[cfg(any(feature = "postgres", feature = "mysql"))]
    #[error("sql error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Redis client failure
    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] bb8_redis::redis::RedisError),

    /// Connection pool could not hand out a connection
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Embedded database failure
    #[cfg(feature = "embedded")]
    #[error("embedded store error: {0}")]
    Embedded(#[from] redb::Error),

    /// A stored value could not be encoded or decoded
    #[error("failed to (de)serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A blocking storage task panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Backend selected in configuration is unusable
    #[error("store configuration error: {0}")]
    Config(String),
}

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a pool error from any displayable cause
    pub fn pool(reason: impl std::fmt::Display) -> Self {
        Self::Pool(reason.to_string())
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// Error returned by record access operations.
///
/// The display text of the first three variants is exactly the message
/// handed back to clients.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Missing or invalid required field
    #[error("{0}")]
    Validation(String),

    /// Duplicate value for a unique field
    #[error("{0}")]
    Conflict(String),

    /// Lookup miss or empty collection
    #[error("{0}")]
    NotFound(String),

    /// Underlying backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for record operations
pub type RecordResult<T> = std::result::Result<T, RecordError>;

impl RecordError {
    /// `invalid [<field>]`
    pub fn invalid(field: &str) -> Self {
        Self::Validation(format!("invalid [{}]", field))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Short machine-readable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store",
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(StoreError::Serialization(err))
    }
}
