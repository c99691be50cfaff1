//! Alert records - append-only, time-windowed retrieval

use serde::{Deserialize, Serialize};

use super::validation::require;
use crate::error::RecordResult;
use crate::records::{Record, Timestamped};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub uuid: String,
    pub title: String,
    pub body: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

/// Payload for creating an alert
#[derive(Debug, Clone, Default)]
pub struct NewAlert {
    pub title: String,
    pub body: String,
}

impl NewAlert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl Record for Alert {
    const NAMESPACE: &'static str = "alert";
    const KIND: &'static str = "alert";
    const PLURAL: &'static str = "alerts";

    fn id(&self) -> &str {
        &self.uuid
    }
}

impl Timestamped for Alert {
    type Draft = NewAlert;

    fn validate(draft: &NewAlert) -> RecordResult<()> {
        require("title", &draft.title)?;
        require("body", &draft.body)
    }

    fn from_draft(draft: NewAlert, uuid: String, timestamp: i64) -> Self {
        Self {
            uuid,
            title: draft.title,
            body: draft.body,
            timestamp,
        }
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
