//! # Booking Repository
//!
//! Bookings keep a JSON snapshot of the car as it was when booked, so a
//! renter's history still renders after the owner edits or removes the
//! listing.

use carhire_core::{Booking, BookingStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::{json_column, to_json};
use crate::error::{DbError, DbResult};

const BOOKING_COLUMNS: &str = r#"
    id, user_id, car_id, owner_id, start_date, end_date,
    total_price_cents, status, pickup_location, dropoff_location,
    with_driver, created_at, car_snapshot
"#;

#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - booking id already used
    /// * `Err(DbError::CheckViolation)` - start date after end date
    pub async fn insert(&self, booking: &Booking) -> DbResult<()> {
        debug!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            car_id = %booking.car_id,
            "Inserting booking"
        );

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, car_id, owner_id, start_date, end_date,
                total_price_cents, status, pickup_location, dropoff_location,
                with_driver, created_at, car_snapshot
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.car_id)
        .bind(&booking.owner_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_price_cents)
        .bind(booking.status.as_str())
        .bind(&booking.pickup_location)
        .bind(&booking.dropoff_location)
        .bind(booking.with_driver)
        .bind(booking.created_at)
        .bind(to_json("car_snapshot", &booking.car)?)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &booking.id),
            other => other,
        })?;

        Ok(())
    }

    /// Bookings made by `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            BOOKING_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(booking_from_row).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let sql = format!("SELECT {} FROM bookings WHERE id = ?1", BOOKING_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(booking_from_row).transpose()
    }
}

fn booking_from_row(row: &SqliteRow) -> DbResult<Booking> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<BookingStatus>()
        .map_err(|e| DbError::CorruptColumn {
            column: "status".to_string(),
            reason: e.to_string(),
        })?;

    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        car_id: row.try_get("car_id")?,
        owner_id: row.try_get("owner_id")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        total_price_cents: row.try_get("total_price_cents")?,
        status,
        pickup_location: row.try_get("pickup_location")?,
        dropoff_location: row.try_get("dropoff_location")?,
        with_driver: row.try_get("with_driver")?,
        created_at: row.try_get("created_at")?,
        car: json_column(row, "car_snapshot")?,
    })
}
