//! Redis key/value store
//!
//! Pooled through `bb8-redis`. Scans walk the keyspace with cursor `SCAN`
//! rather than `KEYS *` so large keyspaces never block the server.

use async_trait::async_trait;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{self, AsyncCommands};
use bb8_redis::RedisConnectionManager;

use super::{Entry, KvStore};
use crate::error::{StoreError, StoreResult};

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 200;

#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisStore {
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let manager = RedisConnectionManager::new(url)?;
        let pool = Pool::builder()
            .max_size(max_connections)
            .build(manager)
            .await?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> StoreResult<PooledConnection<'_, RedisConnectionManager>> {
        self.pool.get().await.map_err(StoreError::pool)
    }

    async fn scan_matching(&self, pattern: &str) -> StoreResult<Vec<Entry>> {
        let mut conn = self.conn().await?;

        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<Vec<u8>>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut *conn)
            .await?;

        // keys deleted between SCAN and MGET come back as nil
        Ok(keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }
}

/// Escape glob metacharacters so `prefix` matches literally in `MATCH`.
pub fn glob_escape(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\' | '^') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[async_trait]
impl KvStore for RedisStore {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn scan(&self) -> StoreResult<Vec<Entry>> {
        self.scan_matching("*").await
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Entry>> {
        let pattern = format!("{}*", glob_escape(prefix));
        self.scan_matching(&pattern).await
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }
}
