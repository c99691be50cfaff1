//! Transaction records

use serde::{Deserialize, Serialize};

use super::validation::require;
use crate::error::RecordResult;
use crate::records::{Record, Timestamped};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub uuid: String,
    pub item: String,
    pub code: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub item: String,
    pub code: String,
}

impl NewTransaction {
    pub fn new(item: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            code: code.into(),
        }
    }
}

impl Record for Transaction {
    const NAMESPACE: &'static str = "txn";
    const KIND: &'static str = "transaction";
    const PLURAL: &'static str = "transactions";

    fn id(&self) -> &str {
        &self.uuid
    }
}

impl Timestamped for Transaction {
    type Draft = NewTransaction;

    fn validate(draft: &NewTransaction) -> RecordResult<()> {
        require("item", &draft.item)?;
        require("code", &draft.code)
    }

    fn from_draft(draft: NewTransaction, uuid: String, timestamp: i64) -> Self {
        Self {
            uuid,
            item: draft.item,
            code: draft.code,
            timestamp,
        }
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
