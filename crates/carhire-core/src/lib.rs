//! # carhire-core: Pure Domain Logic for Carhire
//!
//! Everything the mobile client and the backend agree on about cars,
//! bookings and users, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Carhire Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │  carhire-store (client)      │   │  apps/api (backend)          │   │
//! │  │  session, catalog, bookings  │   │  /cars, /users               │   │
//! │  └──────────────┬───────────────┘   └──────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────────────────────▼───────────────┐   │
//! │  │               ★ carhire-core (THIS CRATE) ★                      │   │
//! │  │                                                                  │   │
//! │  │   types     money     filter     booking    format    email     │   │
//! │  │   Car       Money     Search     Draft      phone     templates │   │
//! │  │   Booking             Criteria   quote()    plate               │   │
//! │  │                                                                  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Role, Car, Booking, patches)
//! - [`money`] - Money type with integer arithmetic
//! - [`filter`] - Catalog filter (text, location, category, price)
//! - [`booking`] - Booking drafts and price quotes
//! - [`validation`] - Business rule validation
//! - [`format`] - Phone/plate normalization and slugs
//! - [`email`] - HTML email templates
//! - [`seed`] - Static sample catalog
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use carhire_core::filter::{filter_cars, SearchCriteria};
//! use carhire_core::seed::sample_catalog;
//!
//! let catalog = sample_catalog();
//! let criteria = SearchCriteria::default().with_category("luxury");
//! let luxury = filter_cars(&catalog, &criteria);
//! assert!(luxury.iter().all(|car| car.make == "BMW" || car.price_per_day_cents > 10_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod booking;
pub mod email;
pub mod error;
pub mod filter;
pub mod format;
pub mod money;
pub mod seed;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use booking::{BookingDraft, Quote};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{filter_cars, CatalogSort, SearchCriteria};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound of a car's aggregate rating (stars).
pub const MAX_RATING: f64 = 5.0;

/// Default upper bound of the search screen's price slider: 1,000.00 per day.
pub const DEFAULT_MAX_PRICE: Money = Money::from_cents(100_000);

/// Highest daily or per-km price a listing may carry: 100,000.00.
pub const MAX_LISTING_PRICE: Money = Money::from_cents(10_000_000);

/// Daily price above which a car counts as luxury: 100.00 per day.
pub const LUXURY_PRICE_THRESHOLD: Money = Money::from_cents(10_000);

/// Oldest model year accepted for a listing.
pub const MIN_CAR_YEAR: i32 = 1950;

/// Maximum seats accepted for a listing.
pub const MAX_SEATS: u8 = 60;
