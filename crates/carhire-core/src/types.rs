//! # Domain Types
//!
//! Core domain types shared by the client store and the backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │       Car       │   │    Booking      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  owner_id       │◄──│  car (snapshot) │       │
//! │  │  email, name    │   │  make, model    │   │  user_id        │       │
//! │  │  phone, avatar  │   │  price_per_day  │   │  start/end date │       │
//! │  └─────────────────┘   │  category?      │   │  status         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Role       │   │    Category     │   │  BookingStatus  │       │
//! │  │  Renter, Owner  │   │  Sedan, Suv,    │   │  Pending → ...  │       │
//! │  └─────────────────┘   │  Luxury, Elec.  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Partial Updates
//! [`CarPatch`] and [`BookingPatch`] carry only the fields being changed.
//! `apply` overwrites exactly the `Some` fields (shallow merge). The car's
//! optional fields use `Option<Option<_>>`: `Some(None)` (JSON `null`) clears.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// User & Role
// =============================================================================

/// A signed-in person. Persisted verbatim as JSON under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Which side of the marketplace the user is acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Renter,
    Owner,
}

impl Role {
    /// The raw string persisted under the `userType` key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Renter => "renter",
            Role::Owner => "owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "renter" => Ok(Role::Renter),
            "owner" => Ok(Role::Owner),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// Vehicle category used by the catalog filter.
///
/// Stored on a [`Car`] when the owner picked one; otherwise the filter falls
/// back to a make/model heuristic (see [`crate::filter`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sedan,
    Suv,
    Luxury,
    Electric,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Sedan,
        Category::Suv,
        Category::Luxury,
        Category::Electric,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Sedan => "sedan",
            Category::Suv => "suv",
            Category::Luxury => "luxury",
            Category::Electric => "electric",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Exact, lowercase match: the UI sends the chip id verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

// =============================================================================
// Car
// =============================================================================

/// A rentable vehicle listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,

    /// Owning user's id.
    pub owner_id: String,

    pub make: String,
    pub model: String,
    pub year: i32,

    /// Image reference (URL or bundled asset name).
    pub image: String,

    /// Daily price in cents.
    pub price_per_day_cents: i64,

    /// Optional distance-based price in cents per km.
    #[serde(default)]
    pub price_per_km_cents: Option<i64>,

    pub location: String,

    #[serde(default = "default_true")]
    pub available: bool,

    /// Days the car cannot be booked, as `YYYY-MM-DD`.
    #[serde(default)]
    pub unavailable_dates: Vec<String>,

    /// Unordered feature tags ("Bluetooth", "GPS", ...).
    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub driver_available: bool,

    #[serde(default)]
    pub driver_included: bool,

    /// Aggregate rating, 0-5.
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub review_count: u32,

    /// Fuel type as entered ("Petrol", "Hybrid", "Electric", ...).
    pub fuel: String,

    pub transmission: String,
    pub seats: u8,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub contact_phone: String,

    #[serde(default)]
    pub contact_email: String,

    /// Category picked by the owner, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

fn default_true() -> bool {
    true
}

impl Car {
    /// Returns the daily price as Money.
    #[inline]
    pub fn price_per_day(&self) -> Money {
        Money::from_cents(self.price_per_day_cents)
    }

    /// "Toyota Camry"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    /// Blocked days that parse as `YYYY-MM-DD`; anything else never blocks.
    pub fn unavailable_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.unavailable_dates
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    /// Checks whether a given day is blocked on this listing.
    pub fn is_unavailable_on(&self, date: NaiveDate) -> bool {
        self.unavailable_days().any(|d| d == date)
    }

    /// Shallow-merges a patch: only `Some` fields overwrite.
    pub fn apply(&mut self, patch: &CarPatch) {
        if let Some(v) = &patch.make {
            self.make = v.clone();
        }
        if let Some(v) = &patch.model {
            self.model = v.clone();
        }
        if let Some(v) = patch.year {
            self.year = v;
        }
        if let Some(v) = &patch.image {
            self.image = v.clone();
        }
        if let Some(v) = patch.price_per_day_cents {
            self.price_per_day_cents = v;
        }
        if let Some(v) = patch.price_per_km_cents {
            self.price_per_km_cents = v;
        }
        if let Some(v) = &patch.location {
            self.location = v.clone();
        }
        if let Some(v) = patch.available {
            self.available = v;
        }
        if let Some(v) = &patch.unavailable_dates {
            self.unavailable_dates = v.clone();
        }
        if let Some(v) = &patch.features {
            self.features = v.clone();
        }
        if let Some(v) = patch.driver_available {
            self.driver_available = v;
        }
        if let Some(v) = patch.driver_included {
            self.driver_included = v;
        }
        if let Some(v) = patch.rating {
            self.rating = v;
        }
        if let Some(v) = patch.review_count {
            self.review_count = v;
        }
        if let Some(v) = &patch.fuel {
            self.fuel = v.clone();
        }
        if let Some(v) = &patch.transmission {
            self.transmission = v.clone();
        }
        if let Some(v) = patch.seats {
            self.seats = v;
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = &patch.contact_phone {
            self.contact_phone = v.clone();
        }
        if let Some(v) = &patch.contact_email {
            self.contact_email = v.clone();
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
    }
}

/// Partial car update. Identity fields (`id`, `owner_id`) are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct CarPatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub image: Option<String>,
    pub price_per_day_cents: Option<i64>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price_per_km_cents: Option<Option<i64>>,
    pub location: Option<String>,
    pub available: Option<bool>,
    pub unavailable_dates: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub driver_available: Option<bool>,
    pub driver_included: Option<bool>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub seats: Option<u8>,
    pub description: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<Category>>,
}

/// A field that is present maps to `Some`, even when it is `null`.
/// Absent fields fall back to `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle of a booking. Transitions are not guarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Bookings that still occupy the car.
    pub const fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(CoreError::UnknownBookingStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A reservation of a car by a renter.
/// Embeds a snapshot of the car as it was when booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub car_id: String,
    pub owner_id: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub total_price_cents: i64,
    pub status: BookingStatus,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub with_driver: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Car data at time of booking (frozen).
    pub car: Car,
}

impl Booking {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    /// Shallow-merges a patch: only `Some` fields overwrite.
    pub fn apply(&mut self, patch: &BookingPatch) {
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.total_price_cents {
            self.total_price_cents = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = &patch.pickup_location {
            self.pickup_location = v.clone();
        }
        if let Some(v) = &patch.dropoff_location {
            self.dropoff_location = v.clone();
        }
        if let Some(v) = patch.with_driver {
            self.with_driver = v;
        }
    }
}

/// Partial booking update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingPatch {
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
    pub total_price_cents: Option<i64>,
    pub status: Option<BookingStatus>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub with_driver: Option<bool>,
}

impl BookingPatch {
    /// Patch that only changes the status.
    pub fn status(status: BookingStatus) -> Self {
        BookingPatch {
            status: Some(status),
            ..Default::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_catalog;

    #[test]
    fn test_role_round_trips_through_raw_string() {
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!(Role::Renter.as_str(), "renter");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_category_parse_is_exact() {
        assert_eq!("suv".parse::<Category>().unwrap(), Category::Suv);
        assert!("SUV".parse::<Category>().is_err());
        assert!("all".parse::<Category>().is_err());
    }

    #[test]
    fn test_booking_status_default() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn test_car_patch_only_touches_supplied_fields() {
        let mut car = sample_catalog().remove(0);
        let before = car.clone();

        car.apply(&CarPatch {
            price_per_day_cents: Some(9900),
            available: Some(false),
            ..Default::default()
        });

        assert_eq!(car.price_per_day_cents, 9900);
        assert!(!car.available);
        assert_eq!(car.make, before.make);
        assert_eq!(car.model, before.model);
        assert_eq!(car.features, before.features);
        assert_eq!(car.rating, before.rating);
    }

    #[test]
    fn test_car_patch_clears_optional_fields() {
        let mut car = sample_catalog().remove(3);
        car.category = Some(Category::Luxury);
        assert!(car.price_per_km_cents.is_some());

        let keep: CarPatch = serde_json::from_str(r#"{"available": false}"#).unwrap();
        assert_eq!(keep.price_per_km_cents, None);
        car.apply(&keep);
        assert!(car.price_per_km_cents.is_some());
        assert_eq!(car.category, Some(Category::Luxury));

        let clear: CarPatch =
            serde_json::from_str(r#"{"pricePerKmCents": null, "category": null}"#).unwrap();
        assert_eq!(clear.price_per_km_cents, Some(None));
        car.apply(&clear);
        assert_eq!(car.price_per_km_cents, None);
        assert_eq!(car.category, None);

        car.apply(&CarPatch {
            category: Some(Some(Category::Suv)),
            ..Default::default()
        });
        assert_eq!(car.category, Some(Category::Suv));
    }

    #[test]
    fn test_car_json_uses_camel_case() {
        let car = sample_catalog().remove(0);
        let json = serde_json::to_value(&car).unwrap();
        assert!(json.get("pricePerDayCents").is_some());
        assert!(json.get("ownerId").is_some());
    }

    #[test]
    fn test_unavailable_dates() {
        let mut car = sample_catalog().remove(0);
        car.unavailable_dates = vec!["2024-06-02".to_string()];
        let blocked = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let free = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert!(car.is_unavailable_on(blocked));
        assert!(!car.is_unavailable_on(free));
    }

    #[test]
    fn test_user_optional_fields_are_omitted() {
        let user = User {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            phone: None,
            avatar: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"id":"u1","email":"ana@example.com","name":"Ana"}"#);
    }
}
