//! # Validation Module
//!
//! Business-rule checks run before a listing, user or booking is accepted.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Mobile client forms (TypeScript)                              │
//! │  ├── Basic format checks, immediate feedback                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Rust                                                          │
//! │  ├── POST /cars/add  → validate_car                                     │
//! │  ├── BookingDraft    → validate_booking_dates                           │
//! │  └── THIS MODULE                                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite CHECK / NOT NULL constraints                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client store itself never validates: it stores what it is handed.

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::types::{Car, User};
use crate::{MAX_LISTING_PRICE, MAX_RATING, MAX_SEATS, MIN_CAR_YEAR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn require(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an email address (shape only: `local@domain.tld`).
///
/// ## Example
/// ```rust
/// use carhire_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana@example").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    require("email", email, 254)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.trim().split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || domain.contains(char::is_whitespace) {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a search query typed into the catalog search bar.
///
/// Empty is fine (no filtering). Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a user identity before it is stored server-side.
pub fn validate_user(user: &User) -> ValidationResult<()> {
    require("id", &user.id, 64)?;
    require("name", &user.name, 120)?;
    validate_email(&user.email)
}

/// Validates a car listing.
///
/// ## Rules
/// - make, model, location, fuel, transmission are required
/// - year between 1950 and next year
/// - price per day (and per km, if set) between 0 and 100,000.00
/// - rating within 0-5
/// - seats between 1 and 60
/// - unavailable dates are `YYYY-MM-DD`
/// - contact email, when given, is well-formed
pub fn validate_car(car: &Car) -> ValidationResult<()> {
    require("id", &car.id, 64)?;
    require("ownerId", &car.owner_id, 64)?;
    require("make", &car.make, 60)?;
    require("model", &car.model, 60)?;
    require("location", &car.location, 200)?;
    require("fuel", &car.fuel, 30)?;
    require("transmission", &car.transmission, 30)?;

    let max_year = Utc::now().year() + 1;
    if car.year < MIN_CAR_YEAR || car.year > max_year {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: MIN_CAR_YEAR as i64,
            max: max_year as i64,
        });
    }

    let price_range = 0..=MAX_LISTING_PRICE.cents();
    if !price_range.contains(&car.price_per_day_cents) {
        return Err(ValidationError::OutOfRange {
            field: "pricePerDay".to_string(),
            min: 0,
            max: MAX_LISTING_PRICE.cents(),
        });
    }

    if matches!(car.price_per_km_cents, Some(p) if !price_range.contains(&p)) {
        return Err(ValidationError::OutOfRange {
            field: "pricePerKm".to_string(),
            min: 0,
            max: MAX_LISTING_PRICE.cents(),
        });
    }

    if !(0.0..=MAX_RATING).contains(&car.rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0,
            max: MAX_RATING as i64,
        });
    }

    if car.seats == 0 || car.seats > MAX_SEATS {
        return Err(ValidationError::OutOfRange {
            field: "seats".to_string(),
            min: 1,
            max: MAX_SEATS as i64,
        });
    }

    for date in &car.unavailable_dates {
        parse_date("unavailableDates", date)?;
    }

    if !car.contact_email.trim().is_empty() {
        validate_email(&car.contact_email)?;
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a date in YYYY-MM-DD form".to_string(),
        }
    })
}

/// Validates that a rental period does not end before it starts.
/// Same-day rentals are allowed.
pub fn validate_booking_dates(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::DateOrder {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_catalog;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.co").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("ana@ex ample.com").is_err());
    }

    #[test]
    fn test_validate_car_rejects_bad_fields() {
        let base = sample_catalog().remove(0);
        assert!(validate_car(&base).is_ok());

        let mut car = base.clone();
        car.price_per_day_cents = -1;
        assert!(validate_car(&car).is_err());

        let mut car = base.clone();
        car.price_per_day_cents = MAX_LISTING_PRICE.cents() + 1;
        assert!(matches!(
            validate_car(&car),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "pricePerDay"
        ));

        let mut car = base.clone();
        car.price_per_km_cents = Some(i64::MAX);
        assert!(validate_car(&car).is_err());

        let mut car = base.clone();
        car.price_per_day_cents = 150_000;
        assert!(validate_car(&car).is_ok());

        let mut car = base.clone();
        car.rating = 5.5;
        assert!(validate_car(&car).is_err());

        let mut car = base.clone();
        car.make = "  ".to_string();
        assert!(matches!(
            validate_car(&car),
            Err(ValidationError::Required { .. })
        ));

        let mut car = base.clone();
        car.seats = 0;
        assert!(validate_car(&car).is_err());

        let mut car = base;
        car.unavailable_dates = vec!["06/01/2024".to_string()];
        assert!(validate_car(&car).is_err());
    }

    #[test]
    fn test_validate_booking_dates() {
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(validate_booking_dates(d1, d2).is_ok());
        assert!(validate_booking_dates(d1, d1).is_ok());
        assert!(validate_booking_dates(d2, d1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  civic ").unwrap(), "civic");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }
}
