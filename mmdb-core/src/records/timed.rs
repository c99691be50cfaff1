//! Append-only records with time-windowed retrieval (alerts, transactions)

use std::sync::Arc;

use super::{now_secs, RecordSet, Timestamped};
use crate::error::{RecordError, RecordResult};
use crate::models::new_identifier;
use crate::store::KvStore;

#[derive(Clone)]
pub struct TimedRecords<R> {
    set: RecordSet<R>,
}

impl<R: Timestamped> TimedRecords<R> {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            set: RecordSet::new(store),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.set.backend_name()
    }

    /// Validate, stamp with the current time and persist.
    pub async fn create(&self, draft: R::Draft) -> RecordResult<R> {
        self.create_at(draft, now_secs()).await
    }

    pub async fn create_at(&self, draft: R::Draft, timestamp: i64) -> RecordResult<R> {
        R::validate(&draft)?;
        let record = R::from_draft(draft, new_identifier(), timestamp);
        self.set.save(&record).await?;
        tracing::debug!(kind = R::KIND, uuid = record.id(), timestamp, "record created");
        Ok(record)
    }

    /// Every record, oldest first.
    pub async fn list(&self) -> RecordResult<Vec<R>> {
        let mut records = self.set.list().await?;
        records.sort_by_key(R::timestamp);
        Ok(records)
    }

    /// Records created within the last `window_secs` seconds, oldest first.
    pub async fn recent(&self, window_secs: i64) -> RecordResult<Vec<R>> {
        self.recent_at(window_secs, now_secs()).await
    }

    /// [`recent`](Self::recent) evaluated at a fixed `now`.
    pub async fn recent_at(&self, window_secs: i64, now: i64) -> RecordResult<Vec<R>> {
        if window_secs < 0 {
            return Err(RecordError::invalid("window"));
        }
        let cutoff = now.saturating_sub(window_secs);

        let mut records: Vec<R> = self
            .set
            .all()
            .await?
            .into_iter()
            .filter(|record| record.timestamp() >= cutoff)
            .collect();
        if records.is_empty() {
            return Err(RecordError::not_found(format!("no recent {}", R::PLURAL)));
        }

        records.sort_by_key(R::timestamp);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, NewAlert};
    use crate::store::MemoryStore;

    fn alerts() -> TimedRecords<Alert> {
        TimedRecords::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn negative_window_is_invalid() {
        let err = alerts().recent_at(-1, 100).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid [window]");
    }

    #[tokio::test]
    async fn window_boundary_is_inclusive() {
        let records = alerts();
        records.create_at(NewAlert::new("old", "b"), 40).await.unwrap();
        records.create_at(NewAlert::new("edge", "b"), 50).await.unwrap();

        let recent = records.recent_at(50, 100).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "edge");
    }

    #[tokio::test]
    async fn list_orders_by_timestamp() {
        let records = alerts();
        records.create_at(NewAlert::new("late", "b"), 30).await.unwrap();
        records.create_at(NewAlert::new("early", "b"), 10).await.unwrap();

        let titles: Vec<_> = records
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["early", "late"]);
    }
}
