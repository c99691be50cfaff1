//! Embedded on-disk key/value store backed by redb.
//!
//! redb is synchronous, so every operation runs on tokio's blocking pool.
//! The database file holds an exclusive lock: open it once per process.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};

use super::{Entry, KvStore};
use crate::error::{StoreError, StoreResult};

/// records: key -> serialized record
const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

fn embedded_err(err: impl Into<redb::Error>) -> StoreError {
    StoreError::Embedded(err.into())
}

#[derive(Clone)]
pub struct EmbeddedStore {
    db: Arc<Database>,
}

impl EmbeddedStore {
    /// Open (or create) the database file, creating parent directories.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> StoreResult<Self> {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::config(format!(
                            "cannot create directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }

            let db = Database::create(&path).map_err(embedded_err)?;

            // Create the table up front so read transactions never miss it
            let txn = db.begin_write().map_err(embedded_err)?;
            txn.open_table(RECORDS).map_err(embedded_err)?;
            txn.commit().map_err(embedded_err)?;

            tracing::info!(path = %path.display(), "embedded store opened");
            Ok(Self { db: Arc::new(db) })
        })
        .await?
    }

    /// Run a closure against the database on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> StoreResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db)).await?
    }
}

fn collect_entries(
    range: redb::Range<'_, &'static str, &'static [u8]>,
    prefix: &str,
) -> StoreResult<Vec<Entry>> {
    let mut entries = Vec::new();
    for item in range {
        let (key, value) = item.map_err(embedded_err)?;
        let key = key.value();
        if !key.starts_with(prefix) {
            break;
        }
        entries.push((key.to_owned(), value.value().to_vec()));
    }
    Ok(entries)
}

#[async_trait]
impl KvStore for EmbeddedStore {
    fn backend_name(&self) -> &'static str {
        "embedded"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let key = key.to_owned();
        self.blocking(move |db| {
            let txn = db.begin_read().map_err(embedded_err)?;
            let table = txn.open_table(RECORDS).map_err(embedded_err)?;
            let value = table.get(key.as_str()).map_err(embedded_err)?;
            Ok(value.map(|guard| guard.value().to_vec()))
        })
        .await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let key = key.to_owned();
        self.blocking(move |db| {
            let txn = db.begin_write().map_err(embedded_err)?;
            {
                let mut table = txn.open_table(RECORDS).map_err(embedded_err)?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(embedded_err)?;
            }
            txn.commit().map_err(embedded_err)?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let key = key.to_owned();
        self.blocking(move |db| {
            let txn = db.begin_write().map_err(embedded_err)?;
            let removed = {
                let mut table = txn.open_table(RECORDS).map_err(embedded_err)?;
                let removed = table.remove(key.as_str()).map_err(embedded_err)?.is_some();
                removed
            };
            txn.commit().map_err(embedded_err)?;
            Ok(removed)
        })
        .await
    }

    async fn scan(&self) -> StoreResult<Vec<Entry>> {
        self.blocking(|db| {
            let txn = db.begin_read().map_err(embedded_err)?;
            let table = txn.open_table(RECORDS).map_err(embedded_err)?;
            let iter = table.iter().map_err(embedded_err)?;
            collect_entries(iter, "")
        })
        .await
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Entry>> {
        let prefix = prefix.to_owned();
        self.blocking(move |db| {
            let txn = db.begin_read().map_err(embedded_err)?;
            let table = txn.open_table(RECORDS).map_err(embedded_err)?;
            let iter = table.range(prefix.as_str()..).map_err(embedded_err)?;
            collect_entries(iter, &prefix)
        })
        .await
    }
}
