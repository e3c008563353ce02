//! # Booking Drafts
//!
//! Turns what the renter picked on the booking screen into a priced,
//! `pending` [`Booking`].
//!
//! ```text
//! BookingDraft { car, start, end, ... }
//!      │
//!      ▼
//! quote()  ── start > end?            → ValidationError::DateOrder
//!      │   ── car unavailable on day? → CoreError::CarUnavailable
//!      │   ── total overflows?        → CoreError::PriceOverflow
//!      ▼
//! Quote { rental_days, daily_rate, total }
//!      │
//!      ▼
//! into_booking() → Booking { status: Pending, car: snapshot }
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Booking, BookingStatus, Car};
use crate::validation::validate_booking_dates;

/// What the renter has chosen but not yet submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub user_id: String,
    pub car: Car,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Empty means "at the car's location".
    pub pickup_location: String,
    /// Empty means "same as pickup".
    pub dropoff_location: String,
    pub with_driver: bool,
}

/// Price breakdown shown before confirming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub rental_days: i64,
    pub daily_rate: Money,
    pub total: Money,
}

impl BookingDraft {
    /// Whole days billed: the date difference, never less than one.
    pub fn rental_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(1)
    }

    /// Validates the period against the listing and prices it.
    pub fn quote(&self) -> CoreResult<Quote> {
        validate_booking_dates(self.start_date, self.end_date)?;

        if !self.car.available {
            return Err(CoreError::CarUnavailable {
                car_id: self.car.id.clone(),
                date: self.start_date.to_string(),
            });
        }

        if let Some(blocked) = self.first_blocked_day() {
            return Err(CoreError::CarUnavailable {
                car_id: self.car.id.clone(),
                date: blocked.to_string(),
            });
        }

        let rental_days = self.rental_days();
        let daily_rate = self.car.price_per_day();
        let total = daily_rate
            .checked_multiply_days(rental_days)
            .ok_or_else(|| CoreError::PriceOverflow {
                car_id: self.car.id.clone(),
                rental_days,
            })?;

        Ok(Quote {
            rental_days,
            daily_rate,
            total,
        })
    }

    /// Earliest unavailable date inside `start..=end`, both ends included.
    fn first_blocked_day(&self) -> Option<NaiveDate> {
        self.car
            .unavailable_days()
            .filter(|d| (self.start_date..=self.end_date).contains(d))
            .min()
    }

    /// Prices the draft and produces a new `pending` booking.
    pub fn into_booking(self) -> CoreResult<Booking> {
        let quote = self.quote()?;

        let pickup_location = if self.pickup_location.trim().is_empty() {
            self.car.location.clone()
        } else {
            self.pickup_location
        };
        let dropoff_location = if self.dropoff_location.trim().is_empty() {
            pickup_location.clone()
        } else {
            self.dropoff_location
        };

        Ok(Booking {
            id: Uuid::new_v4().to_string(),
            user_id: self.user_id,
            car_id: self.car.id.clone(),
            owner_id: self.car.owner_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            total_price_cents: quote.total.cents(),
            status: BookingStatus::Pending,
            pickup_location,
            dropoff_location,
            with_driver: self.with_driver,
            created_at: Utc::now(),
            car: self.car,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::seed::sample_catalog;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn draft(start: u32, end: u32) -> BookingDraft {
        BookingDraft {
            user_id: "renter-1".to_string(),
            car: sample_catalog().remove(0), // $85.00/day
            start_date: date(start),
            end_date: date(end),
            pickup_location: String::new(),
            dropoff_location: String::new(),
            with_driver: false,
        }
    }

    #[test]
    fn test_quote_multiplies_daily_rate() {
        let quote = draft(1, 4).quote().unwrap();
        assert_eq!(quote.rental_days, 3);
        assert_eq!(quote.total.cents(), 25500);
    }

    #[test]
    fn test_same_day_rental_bills_one_day() {
        let quote = draft(5, 5).quote().unwrap();
        assert_eq!(quote.rental_days, 1);
        assert_eq!(quote.total.cents(), 8500);
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let err = draft(4, 1).quote().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DateOrder { .. })
        ));
    }

    #[test]
    fn test_blocked_day_rejected() {
        let mut d = draft(1, 4);
        d.car.unavailable_dates = vec!["2024-06-03".to_string()];
        let err = d.quote().unwrap_err();
        assert!(matches!(err, CoreError::CarUnavailable { ref date, .. } if date == "2024-06-03"));
    }

    #[test]
    fn test_earliest_blocked_day_reported() {
        let mut d = draft(1, 10);
        d.car.unavailable_dates = vec![
            "2024-06-09".to_string(),
            "not a date".to_string(),
            "2024-05-31".to_string(),
            " 2024-06-04 ".to_string(),
        ];
        let err = d.quote().unwrap_err();
        assert!(matches!(err, CoreError::CarUnavailable { ref date, .. } if date == "2024-06-04"));
    }

    #[test]
    fn test_end_day_is_checked() {
        let mut d = draft(1, 4);
        d.car.unavailable_dates = vec!["2024-06-04".to_string()];
        assert!(d.quote().is_err());

        d.car.unavailable_dates = vec!["2024-06-05".to_string()];
        assert!(d.quote().is_ok());
    }

    #[test]
    fn test_long_range_is_quoted_without_walking_days() {
        let mut d = draft(1, 1);
        d.end_date = NaiveDate::MAX;
        d.car.unavailable_dates = vec!["1999-01-01".to_string()];
        let quote = d.quote().unwrap();
        assert_eq!(quote.rental_days, (NaiveDate::MAX - d.start_date).num_days());
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut d = draft(1, 4);
        d.car.price_per_day_cents = i64::MAX / 2;
        let err = d.quote().unwrap_err();
        assert!(matches!(err, CoreError::PriceOverflow { rental_days: 3, .. }));
    }

    #[test]
    fn test_into_booking_snapshots_car() {
        let booking = draft(1, 2).into_booking().unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.car_id, booking.car.id);
        assert_eq!(booking.owner_id, "owner-1");
        assert_eq!(booking.pickup_location, booking.car.location);
        assert_eq!(booking.dropoff_location, booking.pickup_location);
        assert!(Uuid::parse_str(&booking.id).is_ok());
    }
}
