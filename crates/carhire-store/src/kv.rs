//! # Key-Value Adapter
//!
//! The store only needs a durable string map. Anything that implements
//! [`KeyValueStore`] can back it:
//!
//! ```text
//! KeyValueStore
//!   ├── MemoryKv              (tests, ephemeral sessions)
//!   └── KeyValueRepository    (SQLite kv_entries, carhire-db)
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use carhire_db::KeyValueRepository;

use crate::error::StoreResult;

/// Durable string map used by the persistence writer.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Results follow the order of `keys`.
    async fn get_many(&self, keys: &[&str]) -> StoreResult<Vec<(String, Option<String>)>> {
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            entries.push((key.to_string(), self.get(key).await?));
        }
        Ok(entries)
    }

    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated map, for restoring a session in tests.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryKv {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Synchronous read for assertions.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// SQLite
// =============================================================================

#[async_trait]
impl KeyValueStore for KeyValueRepository {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(KeyValueRepository::get(self, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        Ok(KeyValueRepository::set(self, key, value).await?)
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        Ok(KeyValueRepository::remove(self, key).await?)
    }

    async fn get_many(&self, keys: &[&str]) -> StoreResult<Vec<(String, Option<String>)>> {
        Ok(KeyValueRepository::get_many(self, keys).await?)
    }

    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        Ok(KeyValueRepository::remove_many(self, keys).await?)
    }
}

// =============================================================================
// Test support
// =============================================================================

/// Backend whose every call fails.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingKv;

#[cfg(test)]
#[async_trait]
impl KeyValueStore for FailingKv {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(crate::StoreError::Storage("disk unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(crate::StoreError::Storage("disk unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(crate::StoreError::Storage("disk unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carhire_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_memory_kv_default_get_many() {
        let kv = MemoryKv::with_entries([("userType", "owner")]);

        let entries = kv.get_many(&["user", "userType"]).await.unwrap();
        assert_eq!(
            entries,
            vec![
                ("user".to_string(), None),
                ("userType".to_string(), Some("owner".to_string())),
            ]
        );

        kv.remove_many(&["user", "userType"]).await.unwrap();
        assert_eq!(kv.peek("userType"), None);
    }

    #[tokio::test]
    async fn test_sqlite_backend_through_trait() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv: Box<dyn KeyValueStore> = Box::new(db.kv());

        kv.set("user", "{\"id\":\"u1\"}").await.unwrap();
        assert_eq!(
            kv.get("user").await.unwrap().as_deref(),
            Some("{\"id\":\"u1\"}")
        );

        kv.remove_many(&["user"]).await.unwrap();
        assert_eq!(kv.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_database_maps_to_storage_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();
        db.close().await;

        let err = KeyValueStore::get(&kv, "user").await.unwrap_err();
        assert!(matches!(err, crate::StoreError::Storage(_)));
    }
}
