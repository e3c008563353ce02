//! # Carhire API
//!
//! JSON backend consumed by the rental client.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Carhire API Server                               │
//! │                                                                         │
//! │  Client ──► CORS ──► Trace ──► routes::{cars, users, health}           │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                   carhire-db (SQLite)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::{header, Method};
use axum::Router;
use carhire_core::seed::sample_catalog;
use carhire_db::{Database, DbResult};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the full router with middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .merge(routes::cars::routes())
        .merge(routes::users::routes())
        .merge(routes::health::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads the sample catalog when the database has no cars.
/// Returns how many cars were inserted.
pub async fn seed_if_empty(db: &Database) -> DbResult<usize> {
    let existing = db.cars().count().await?;
    if existing > 0 {
        info!(existing, "Catalog present, skipping seed");
        return Ok(0);
    }

    let catalog = sample_catalog();
    for car in &catalog {
        db.cars().insert(car).await?;
    }
    info!(cars = catalog.len(), "Sample catalog seeded");
    Ok(catalog.len())
}
