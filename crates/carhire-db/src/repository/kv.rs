//! # Key-Value Repository
//!
//! Durable string map behind the client session store. The store keeps the
//! signed-in user (JSON) under `user` and the role under `userType`.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Returns the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    /// Inserts or overwrites `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "kv set");

        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Removing a missing key is not an error.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "kv remove");

        sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Reads several keys. The result follows the order of `keys`, with
    /// `None` for keys that are not stored.
    pub async fn get_many(&self, keys: &[&str]) -> DbResult<Vec<(String, Option<String>)>> {
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            entries.push((key.to_string(), self.get(key).await?));
        }
        Ok(entries)
    }

    /// Deletes several keys in one transaction.
    pub async fn remove_many(&self, keys: &[&str]) -> DbResult<()> {
        debug!(count = keys.len(), "kv remove_many");

        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
