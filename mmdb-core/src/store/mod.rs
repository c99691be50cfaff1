//! Storage layer - one key/value interface, several backends
//!
//! # Design Principles
//!
//! - Keys are UTF-8 strings, values are opaque bytes
//! - Record kinds share a store by namespacing keys (`user:<uuid>`)
//! - Each handle is built once at startup and shared read-only
//! - Driver errors are mapped to [`StoreError`] at this seam

pub mod memory;

#[cfg(feature = "embedded")]
pub mod embedded;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendKind, MmdbConfig};
use crate::error::{StoreError, StoreResult};

pub use memory::MemoryStore;

#[cfg(feature = "embedded")]
pub use embedded::EmbeddedStore;
#[cfg(feature = "mysql")]
pub use mysql::MySqlStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
#[cfg(feature = "redis")]
pub use redis::RedisStore;

/// A key/value entry returned by scans
pub type Entry = (String, Vec<u8>);

/// Abstract key/value backend.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`get`](KvStore::get) | Value for an exact key |
/// | [`put`](KvStore::put) | Insert or overwrite |
/// | [`delete`](KvStore::delete) | Remove, reporting whether the key existed |
/// | [`scan`](KvStore::scan) | Every entry |
/// | [`scan_prefix`](KvStore::scan_prefix) | Entries whose key starts with a literal prefix |
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Static backend label for logs
    fn backend_name(&self) -> &'static str;

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Returns `true` if a value was removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    async fn scan(&self) -> StoreResult<Vec<Entry>>;

    /// `prefix` is matched literally; wildcard characters have no meaning.
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Entry>>;

    /// Cheap liveness check.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Release pooled connections. Called once at shutdown.
    async fn close(&self) {}
}

/// Store handles for each record kind, built from configuration.
///
/// Kinds configured with the same backend share one handle (and one pool or
/// file lock).
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn KvStore>,
    pub alerts: Arc<dyn KvStore>,
    pub transactions: Arc<dyn KvStore>,
    unique: Vec<Arc<dyn KvStore>>,
}

impl Stores {
    /// One shared in-memory store for every kind.
    pub fn in_memory() -> Self {
        Self::shared(Arc::new(MemoryStore::new()))
    }

    /// Use the same handle for every kind.
    pub fn shared(store: Arc<dyn KvStore>) -> Self {
        Self {
            users: store.clone(),
            alerts: store.clone(),
            transactions: store.clone(),
            unique: vec![store],
        }
    }

    /// Connect every backend the configuration selects.
    ///
    /// Fails fast on the first backend that cannot be reached.
    pub async fn connect(config: &MmdbConfig) -> StoreResult<Self> {
        let mut opener = Opener::default();
        let users = opener.open(config.stores.users, config).await?;
        let alerts = opener.open(config.stores.alerts, config).await?;
        let transactions = opener.open(config.stores.transactions, config).await?;

        Ok(Self {
            users,
            alerts,
            transactions,
            unique: opener.unique,
        })
    }

    /// Ping each record kind's store.
    pub async fn ping_all(&self) -> Vec<(&'static str, &'static str, StoreResult<()>)> {
        let mut results = Vec::with_capacity(3);
        for (kind, store) in [
            ("users", &self.users),
            ("alerts", &self.alerts),
            ("transactions", &self.transactions),
        ] {
            results.push((kind, store.backend_name(), store.ping().await));
        }
        results
    }

    /// Close each distinct backend once.
    pub async fn close(&self) {
        for store in &self.unique {
            tracing::debug!(backend = store.backend_name(), "closing store");
            store.close().await;
        }
    }
}

/// Opens each backend kind at most once.
#[derive(Default)]
struct Opener {
    opened: HashMap<BackendKind, Arc<dyn KvStore>>,
    unique: Vec<Arc<dyn KvStore>>,
}

impl Opener {
    async fn open(&mut self, kind: BackendKind, config: &MmdbConfig) -> StoreResult<Arc<dyn KvStore>> {
        if let Some(store) = self.opened.get(&kind) {
            return Ok(store.clone());
        }

        let store = open_backend(kind, config).await?;
        store.ping().await?;
        tracing::info!(backend = store.backend_name(), "store connected");

        self.opened.insert(kind, store.clone());
        self.unique.push(store.clone());
        Ok(store)
    }
}

async fn open_backend(kind: BackendKind, config: &MmdbConfig) -> StoreResult<Arc<dyn KvStore>> {
    match kind {
        BackendKind::Memory => Ok(Arc::new(MemoryStore::new())),

        #[cfg(feature = "postgres")]
        BackendKind::Postgres => {
            let section = config
                .postgres
                .as_ref()
                .ok_or_else(|| StoreError::config("postgres selected but not configured"))?;
            let store = PostgresStore::connect(&section.url, section.max_connections).await?;
            Ok(Arc::new(store))
        }

        #[cfg(feature = "mysql")]
        BackendKind::Mysql => {
            let section = config
                .mysql
                .as_ref()
                .ok_or_else(|| StoreError::config("mysql selected but not configured"))?;
            let store = MySqlStore::connect(&section.url, section.max_connections).await?;
            Ok(Arc::new(store))
        }

        #[cfg(feature = "redis")]
        BackendKind::Redis => {
            let section = config
                .redis
                .as_ref()
                .ok_or_else(|| StoreError::config("redis selected but not configured"))?;
            let store = RedisStore::connect(&section.url, section.max_connections).await?;
            Ok(Arc::new(store))
        }

        #[cfg(feature = "embedded")]
        BackendKind::Embedded => {
            let store = EmbeddedStore::open(&config.embedded.path).await?;
            Ok(Arc::new(store))
        }

        #[allow(unreachable_patterns)] // only reachable with a backend feature disabled
        other => Err(StoreError::config(format!(
            "backend '{}' is not compiled into this build",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shared_store_backs_every_kind() {
        let stores = Stores::in_memory();
        stores.users.put("user:1", b"x".to_vec()).await.unwrap();
        assert_eq!(
            stores.alerts.get("user:1").await.unwrap(),
            Some(b"x".to_vec())
        );
    }

    #[tokio::test]
    async fn connect_memory_config() {
        let config = MmdbConfig::default();
        let stores = Stores::connect(&config).await.unwrap();
        let pings = stores.ping_all().await;
        assert_eq!(pings.len(), 3);
        assert!(pings.iter().all(|(_, backend, res)| *backend == "memory" && res.is_ok()));
        // all three kinds share one handle
        assert_eq!(stores.unique.len(), 1);
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn connect_without_section_fails() {
        let mut config = MmdbConfig::default();
        config.stores.users = BackendKind::Postgres;
        config.postgres = None;
        let err = Stores::connect(&config).await.err().unwrap();
        assert!(err.to_string().contains("postgres selected but not configured"));
    }
}
