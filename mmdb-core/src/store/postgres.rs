//! Postgres key/value store
//!
//! Uses sqlx PgPool with explicit connection limits. Records live in a single
//! two-column table created on connect.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Entry, KvStore};
use crate::error::StoreResult;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and make sure the table exists.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = PostgresStore::connect("postgres://localhost/mmdb", 5).await?;
    /// ```
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        tracing::debug!("ensuring mmdb_kv table exists");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mmdb_kv (
                key TEXT PRIMARY KEY,
                value BYTEA NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT value FROM mmdb_kv WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mmdb_kv (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM mmdb_kv WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self) -> StoreResult<Vec<Entry>> {
        let rows: Vec<Entry> = sqlx::query_as("SELECT key, value FROM mmdb_kv ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Entry>> {
        // left() compares literally, unlike LIKE
        let rows: Vec<Entry> = sqlx::query_as(
            r#"
            SELECT key, value FROM mmdb_kv
            WHERE left(key, char_length($1)) = $1
            ORDER BY key
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run with: DATABASE_URL=postgres://... cargo test -p mmdb-core -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn put_get_scan_delete() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let store = PostgresStore::connect(&url, DEFAULT_MAX_CONNECTIONS)
            .await
            .expect("connect failed");

        let key = format!("test:{}", uuid::Uuid::new_v4());
        store.put(&key, b"one".to_vec()).await.unwrap();
        store.put(&key, b"two".to_vec()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(b"two".to_vec()));

        let found = store.scan_prefix(&key).await.unwrap();
        assert_eq!(found.len(), 1);

        assert!(store.delete(&key).await.unwrap());
        assert!(!store.delete(&key).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn prefix_with_wildcards_is_literal() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let store = PostgresStore::connect(&url, DEFAULT_MAX_CONNECTIONS)
            .await
            .expect("connect failed");

        let base = uuid::Uuid::new_v4().to_string();
        store.put(&format!("{base}:a_b"), b"1".to_vec()).await.unwrap();
        store.put(&format!("{base}:axb"), b"2".to_vec()).await.unwrap();

        let found = store.scan_prefix(&format!("{base}:a_")).await.unwrap();
        assert_eq!(found.len(), 1);

        store.delete(&format!("{base}:a_b")).await.unwrap();
        store.delete(&format!("{base}:axb")).await.unwrap();
    }
}
