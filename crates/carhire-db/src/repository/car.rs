//! # Car Repository
//!
//! Backend catalog storage. `list` returns cars in insertion order, which
//! is the order the mobile client displays and filters.

use carhire_core::{Car, Category};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use super::{json_column, to_json};
use crate::error::{DbError, DbResult};

const CAR_COLUMNS: &str = r#"
    id, owner_id, make, model, year, image,
    price_per_day_cents, price_per_km_cents, location, available,
    unavailable_dates, features, driver_available, driver_included,
    rating, review_count, fuel, transmission, seats, description,
    contact_phone, contact_email, category
"#;

#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    /// Inserts a new listing.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - a car with this id exists
    pub async fn insert(&self, car: &Car) -> DbResult<()> {
        debug!(car_id = %car.id, owner_id = %car.owner_id, "Inserting car");

        sqlx::query(
            r#"
            INSERT INTO cars (
                id, owner_id, make, model, year, image,
                price_per_day_cents, price_per_km_cents, location, available,
                unavailable_dates, features, driver_available, driver_included,
                rating, review_count, fuel, transmission, seats, description,
                contact_phone, contact_email, category, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24
            )
            "#,
        )
        .bind(&car.id)
        .bind(&car.owner_id)
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.year as i64)
        .bind(&car.image)
        .bind(car.price_per_day_cents)
        .bind(car.price_per_km_cents)
        .bind(&car.location)
        .bind(car.available)
        .bind(to_json("unavailable_dates", &car.unavailable_dates)?)
        .bind(to_json("features", &car.features)?)
        .bind(car.driver_available)
        .bind(car.driver_included)
        .bind(car.rating)
        .bind(car.review_count as i64)
        .bind(&car.fuel)
        .bind(&car.transmission)
        .bind(car.seats as i64)
        .bind(&car.description)
        .bind(&car.contact_phone)
        .bind(&car.contact_email)
        .bind(car.category.map(|c| c.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &car.id),
            other => other,
        })?;

        Ok(())
    }

    /// All cars, oldest listing first.
    pub async fn list(&self) -> DbResult<Vec<Car>> {
        let sql = format!("SELECT {} FROM cars ORDER BY rowid", CAR_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let cars = rows.iter().map(car_from_row).collect::<DbResult<Vec<_>>>()?;
        debug!(count = cars.len(), "Listed cars");
        Ok(cars)
    }

    /// ## Returns
    /// * `Ok(None)` - no car with this id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Car>> {
        let sql = format!("SELECT {} FROM cars WHERE id = ?1", CAR_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(car_from_row).transpose()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn car_from_row(row: &SqliteRow) -> DbResult<Car> {
    let category: Option<String> = row.try_get("category")?;
    let category = category.and_then(|raw| match raw.parse::<Category>() {
        Ok(c) => Some(c),
        Err(e) => {
            warn!(error = %e, "Ignoring unknown stored category");
            None
        }
    });

    let year: i64 = row.try_get("year")?;
    let review_count: i64 = row.try_get("review_count")?;
    let seats: i64 = row.try_get("seats")?;

    Ok(Car {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        make: row.try_get("make")?,
        model: row.try_get("model")?,
        year: year as i32,
        image: row.try_get("image")?,
        price_per_day_cents: row.try_get("price_per_day_cents")?,
        price_per_km_cents: row.try_get("price_per_km_cents")?,
        location: row.try_get("location")?,
        available: row.try_get("available")?,
        unavailable_dates: json_column(row, "unavailable_dates")?,
        features: json_column(row, "features")?,
        driver_available: row.try_get("driver_available")?,
        driver_included: row.try_get("driver_included")?,
        rating: row.try_get("rating")?,
        review_count: review_count.max(0) as u32,
        fuel: row.try_get("fuel")?,
        transmission: row.try_get("transmission")?,
        seats: seats.clamp(0, u8::MAX as i64) as u8,
        description: row.try_get("description")?,
        contact_phone: row.try_get("contact_phone")?,
        contact_email: row.try_get("contact_email")?,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use carhire_core::seed::sample_catalog;

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cars();

        let catalog = sample_catalog();
        for car in catalog.iter().rev() {
            repo.insert(car).await.unwrap();
        }

        let listed = repo.list().await.unwrap();
        let expected: Vec<Car> = catalog.into_iter().rev().collect();
        assert_eq!(listed, expected);
        assert_eq!(repo.count().await.unwrap(), expected.len() as i64);
    }

    #[tokio::test]
    async fn test_get_by_id_round_trips_all_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cars();

        let mut car = sample_catalog().remove(3);
        car.category = Some(Category::Luxury);
        car.unavailable_dates = vec!["2024-06-01".to_string()];
        repo.insert(&car).await.unwrap();

        assert_eq!(repo.get_by_id(&car.id).await.unwrap(), Some(car));
        assert_eq!(repo.get_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cars();
        let car = sample_catalog().remove(0);

        repo.insert(&car).await.unwrap();
        let err = repo.insert(&car).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "1"));
    }

    #[tokio::test]
    async fn test_negative_price_hits_check_constraint() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut car = sample_catalog().remove(0);
        car.price_per_day_cents = -100;

        let err = db.cars().insert(&car).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation(_)));
    }
}
