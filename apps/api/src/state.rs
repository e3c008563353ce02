use carhire_db::Database;

/// Shared application state. Cheap to clone: `Database` wraps a pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
