//! # carhire-db: Database Layer for Carhire
//!
//! SQLite access with sqlx. Serves two consumers:
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  carhire-store (AppStore)              apps/api (HTTP routes)          │
//! │       │ get/set/remove "user"               │ /cars, /users            │
//! │       ▼                                     ▼                           │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     carhire-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │  Repositories      │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  KeyValue, Car,    │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │  Booking, User     │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carhire_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("carhire.db")).await?;
//! let cars = db.cars().list().await?;
//! db.kv().set("userType", "owner").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::booking::BookingRepository;
pub use repository::car::CarRepository;
pub use repository::kv::KeyValueRepository;
pub use repository::user::{UserProfile, UserRepository};
