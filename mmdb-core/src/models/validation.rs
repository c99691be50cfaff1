//! Field validation helpers shared by the payload types

use crate::error::{RecordError, RecordResult};

/// Reject an empty required field.
pub fn require(field: &str, value: &str) -> RecordResult<()> {
    if value.is_empty() {
        return Err(RecordError::invalid(field));
    }
    Ok(())
}

/// Treat empty strings as "not provided".
pub fn provided(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
