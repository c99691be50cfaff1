//! MySQL key/value store

use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use super::{Entry, KvStore};
use crate::error::StoreResult;

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        // `key` is reserved in MySQL; binary collation keeps key matching
        // case- and accent-sensitive like the other backends
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mmdb_kv (
                k VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL PRIMARY KEY,
                v LONGBLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for MySqlStore {
    fn backend_name(&self) -> &'static str {
        "mysql"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT v FROM mmdb_kv WHERE k = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        sqlx::query("INSERT INTO mmdb_kv (k, v) VALUES (?, ?) ON DUPLICATE KEY UPDATE v = VALUES(v)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM mmdb_kv WHERE k = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self) -> StoreResult<Vec<Entry>> {
        let rows: Vec<Entry> = sqlx::query_as("SELECT k, v FROM mmdb_kv ORDER BY k")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Entry>> {
        let rows: Vec<Entry> = sqlx::query_as(
            "SELECT k, v FROM mmdb_kv WHERE LEFT(k, CHAR_LENGTH(?)) = ? ORDER BY k",
        )
        .bind(prefix)
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

    // Run with: MYSQL_URL=mysql://... cargo test -p mmdb-core -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn put_get_scan_delete() {
        let url = std::env::var("MYSQL_URL").expect("MYSQL_URL required");
        let store = MySqlStore::connect(&url, 2).await.expect("connect failed");

        let key = format!("test:{}", uuid::Uuid::new_v4());
        store.put(&key, b"one".to_vec()).await.unwrap();
        store.put(&key, b"two".to_vec()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.scan_prefix(&key).await.unwrap().len(), 1);
        assert!(store.delete(&key).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn keys_are_case_sensitive() {
        let url = std::env::var("MYSQL_URL").expect("MYSQL_URL required");
        let store = MySqlStore::connect(&url, 2).await.expect("connect failed");

        let base = uuid::Uuid::new_v4().to_string();
        let lower = format!("{base}:alice");
        let upper = format!("{base}:ALICE");
        store.put(&lower, b"lower".to_vec()).await.unwrap();

        assert_eq!(store.get(&upper).await.unwrap(), None);
        assert!(store.scan_prefix(&format!("{base}:A")).await.unwrap().is_empty());

        store.put(&upper, b"upper".to_vec()).await.unwrap();
        assert_eq!(store.get(&lower).await.unwrap(), Some(b"lower".to_vec()));
        assert_eq!(store.scan_prefix(&base).await.unwrap().len(), 2);

        store.delete(&lower).await.unwrap();
        store.delete(&upper).await.unwrap();
    }
}
