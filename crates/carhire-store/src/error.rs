//! # Store Error Types
//!
//! None of these reach the code that mutates the store. They surface only
//! through a [`PersistTicket`](crate::PersistTicket) or in logs.

use carhire_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The key-value backend rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted value could not be parsed back.
    #[error("Corrupt value under '{key}': {reason}")]
    CorruptValue { key: String, reason: String },

    /// The persistence writer has shut down.
    #[error("Persistence writer closed")]
    WriterClosed,
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Storage(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
