//! # Seed Data Loader
//!
//! Loads the sample catalog and its owners into a development database.
//!
//! ## Usage
//! ```bash
//! # Seed ./carhire_dev.db
//! cargo run -p carhire-db --bin seed
//!
//! # Specify database path
//! cargo run -p carhire-db --bin seed -- --db ./data/carhire.db
//! ```
//!
//! A database that already has cars is left untouched.

use carhire_core::seed::sample_catalog;
use carhire_core::{Role, User};
use carhire_db::{Database, DbConfig, DbError};
use std::collections::BTreeSet;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./carhire_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Carhire Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./carhire_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    info!(path = %db_path, "Connected, migrations applied");

    let existing = db.cars().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has cars, skipping seed");
        return Ok(());
    }

    let catalog = sample_catalog();
    let owners: BTreeSet<String> = catalog.iter().map(|c| c.owner_id.clone()).collect();

    for owner_id in &owners {
        let owner = User {
            id: owner_id.clone(),
            email: format!("{}@carhire.example", owner_id),
            name: format!("Owner {}", owner_id.trim_start_matches("owner-")),
            phone: Some("0712345678".to_string()),
            avatar: None,
        };
        match db.users().insert(&owner, Role::Owner).await {
            Ok(()) | Err(DbError::UniqueViolation { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let mut inserted = 0;
    for car in &catalog {
        if let Err(e) = db.cars().insert(car).await {
            warn!(car_id = %car.id, error = %e, "Failed to insert car");
            continue;
        }
        inserted += 1;
    }

    info!(cars = inserted, owners = owners.len(), "Seed complete");
    Ok(())
}
