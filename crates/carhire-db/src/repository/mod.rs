//! # Repository Module
//!
//! Each repository wraps the pool and keeps its SQL in one place.
//!
//! ```text
//! KeyValueRepository   kv_entries   get / set / remove / get_many / remove_many
//! CarRepository        cars         insert / list / get_by_id / count
//! BookingRepository    bookings     insert / list_for_user / get_by_id
//! UserRepository       users        insert / get_by_id
//! ```
//!
//! Queries are built at runtime (`sqlx::query`) and rows are mapped by
//! hand, so the crate builds without a live database.

pub mod booking;
pub mod car;
pub mod kv;
pub mod user;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::{DbError, DbResult};

/// Decodes a JSON text column into `T`.
pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> DbResult<T> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| DbError::corrupt(column, e))
}

/// Encodes `value` for a JSON text column.
pub(crate) fn to_json<T: serde::Serialize>(column: &str, value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::corrupt(column, e))
}
