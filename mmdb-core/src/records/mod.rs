//! Record access layer
//!
//! Typed CRUD over the [`KvStore`] trait. Each record kind is stored as JSON
//! under `<namespace>:<uuid>` so several kinds can share one backend.

mod timed;
mod users;

pub use timed::TimedRecords;
pub use users::UserRecords;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RecordError, RecordResult};
use crate::models::{Alert, Transaction};
use crate::store::{KvStore, Stores};

/// A persistable record kind
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key namespace, e.g. `user` in `user:<uuid>`
    const NAMESPACE: &'static str;
    /// Singular name used in error messages
    const KIND: &'static str;
    /// Plural name used in error messages
    const PLURAL: &'static str;

    fn id(&self) -> &str;
}

/// Append-only records stamped with a creation time.
pub trait Timestamped: Record {
    /// Creation payload
    type Draft: Send;

    fn validate(draft: &Self::Draft) -> RecordResult<()>;

    fn from_draft(draft: Self::Draft, uuid: String, timestamp: i64) -> Self;

    /// Seconds since the Unix epoch
    fn timestamp(&self) -> i64;
}

/// Typed view of one namespace in a key/value store
pub struct RecordSet<R> {
    store: Arc<dyn KvStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordSet<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> RecordSet<R> {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn key(id: &str) -> String {
        format!("{}:{}", R::NAMESPACE, id)
    }

    fn prefix() -> String {
        format!("{}:", R::NAMESPACE)
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn find(&self, id: &str) -> RecordResult<Option<R>> {
        match self.store.get(&Self::key(id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Like [`find`](Self::find), but a miss is `NotFound("<kind> not found")`.
    pub async fn get(&self, id: &str) -> RecordResult<R> {
        self.find(id)
            .await?
            .ok_or_else(|| RecordError::not_found(format!("{} not found", R::KIND)))
    }

    /// Every record in the namespace, in key order.
    pub async fn all(&self) -> RecordResult<Vec<R>> {
        self.store
            .scan_prefix(&Self::prefix())
            .await?
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(RecordError::from))
            .collect()
    }

    /// Like [`all`](Self::all), but an empty namespace is
    /// `NotFound("no <plural> yet")`.
    pub async fn list(&self) -> RecordResult<Vec<R>> {
        let records = self.all().await?;
        if records.is_empty() {
            return Err(RecordError::not_found(format!("no {} yet", R::PLURAL)));
        }
        Ok(records)
    }

    /// Insert or overwrite.
    pub async fn save(&self, record: &R) -> RecordResult<()> {
        let bytes = serde_json::to_vec(record)?;
        self.store.put(&Self::key(record.id()), bytes).await?;
        Ok(())
    }

    /// Returns `true` if the record existed.
    pub async fn remove(&self, id: &str) -> RecordResult<bool> {
        Ok(self.store.delete(&Self::key(id)).await?)
    }
}

/// Access to every record kind
#[derive(Clone)]
pub struct Records {
    pub users: UserRecords,
    pub alerts: TimedRecords<Alert>,
    pub transactions: TimedRecords<Transaction>,
}

impl Records {
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: UserRecords::new(stores.users.clone()),
            alerts: TimedRecords::new(stores.alerts.clone()),
            transactions: TimedRecords::new(stores.transactions.clone()),
        }
    }

    /// Every kind backed by one fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(&Stores::in_memory())
    }
}

/// Current time in seconds since the Unix epoch
pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAlert;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn records_are_namespaced() {
        let store = Arc::new(MemoryStore::new());
        let set: RecordSet<Alert> = RecordSet::new(store.clone());

        let alert = Alert::from_draft(NewAlert::new("t", "b"), "a-1".into(), 10);
        set.save(&alert).await.unwrap();

        assert!(store.get("alert:a-1").await.unwrap().is_some());
        assert_eq!(set.get("a-1").await.unwrap(), alert);
    }

    #[tokio::test]
    async fn other_namespaces_are_invisible() {
        let store = Arc::new(MemoryStore::new());
        store.put("user:x", b"{}".to_vec()).await.unwrap();

        let set: RecordSet<Alert> = RecordSet::new(store);
        assert!(set.all().await.unwrap().is_empty());
        assert_eq!(set.list().await.unwrap_err().to_string(), "no alerts yet");
    }

    #[tokio::test]
    async fn corrupt_value_is_store_error() {
        let store = Arc::new(MemoryStore::new());
        store.put("alert:bad", b"not json".to_vec()).await.unwrap();

        let set: RecordSet<Alert> = RecordSet::new(store);
        let err = set.get("bad").await.unwrap_err();
        assert_eq!(err.kind(), "store");
    }

    #[tokio::test]
    async fn remove_reports_existence() {
        let set: RecordSet<Alert> = RecordSet::new(Arc::new(MemoryStore::new()));
        let alert = Alert::from_draft(NewAlert::new("t", "b"), "a-1".into(), 10);
        set.save(&alert).await.unwrap();

        assert!(set.remove("a-1").await.unwrap());
        assert!(!set.remove("a-1").await.unwrap());
        assert_eq!(set.get("a-1").await.unwrap_err().to_string(), "alert not found");
    }
}
