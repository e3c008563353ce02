//! # Application Store
//!
//! Single source of truth for the client session: who is signed in, which
//! side of the marketplace they act on, their cars, the public catalog and
//! their bookings.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Operations                                     │
//! │                                                                         │
//! │  Screen Action            AppStore call           Persisted             │
//! │  ─────────────            ─────────────           ─────────             │
//! │                                                                         │
//! │  Sign in ────────────────► sign_in(user, role) ──► user, userType       │
//! │  Pick role ──────────────► set_role(Some(r)) ────► userType             │
//! │  Load catalog ───────────► set_all_cars(cars) ───► (memory only)        │
//! │  List a car ─────────────► add_car(car) ─────────► (memory only)        │
//! │  Edit a car ─────────────► update_car(id, patch) ► (memory only)        │
//! │  Book ───────────────────► add_booking(b) ───────► (memory only)        │
//! │  Sign out ───────────────► logout() ─────────────► remove both keys     │
//! │  App start ──────────────► initialize().await ◄── read both keys        │
//! │                                                                         │
//! │  NOTE: every mutation runs under one lock acquisition. Persisting       │
//! │        mutations enqueue their write before releasing the lock, so      │
//! │        the writer sees them in the same order as the state did.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use carhire_core::{
    filter_cars, Booking, BookingPatch, Car, CarPatch, Role, SearchCriteria, User,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use crate::persist::{PersistHandle, PersistTicket, PersistWriter};

/// Key holding the signed-in user as JSON.
pub const USER_KEY: &str = "user";

/// Key holding the raw role string (`renter` / `owner`).
pub const ROLE_KEY: &str = "userType";

/// Everything the store holds in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub user: Option<User>,
    pub role: Option<Role>,
    /// The signed-in owner's listings.
    pub cars: Vec<Car>,
    /// The platform-wide catalog.
    pub all_cars: Vec<Car>,
    pub bookings: Vec<Booking>,
}

pub struct AppStore {
    state: Mutex<StoreState>,
    writer: PersistHandle,
}

impl AppStore {
    /// Builds an empty store and starts its persistence writer.
    ///
    /// Must be called inside a Tokio runtime. Call [`initialize`](Self::initialize)
    /// afterwards to restore a previous session.
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        AppStore {
            state: Mutex::new(StoreState::default()),
            writer: PersistWriter::new(kv).start(config),
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Replaces the user. `None` removes the persisted copy.
    pub fn set_user(&self, user: Option<User>) -> PersistTicket {
        let mut state = self.state();
        let ticket = match &user {
            Some(u) => match serde_json::to_string(u) {
                Ok(json) => self.writer.set(USER_KEY, json),
                Err(e) => {
                    warn!(error = %e, "Could not serialize user, not persisted");
                    PersistTicket::settled(Err(StoreError::CorruptValue {
                        key: USER_KEY.to_string(),
                        reason: e.to_string(),
                    }))
                }
            },
            None => self.writer.remove(USER_KEY),
        };
        debug!(signed_in = user.is_some(), "User set");
        state.user = user;
        ticket
    }

    /// Replaces the role. `None` removes the persisted copy.
    pub fn set_role(&self, role: Option<Role>) -> PersistTicket {
        let mut state = self.state();
        let ticket = match role {
            Some(r) => self.writer.set(ROLE_KEY, r.as_str()),
            None => self.writer.remove(ROLE_KEY),
        };
        debug!(role = ?role, "Role set");
        state.role = role;
        ticket
    }

    /// Sets user and role together so no reader sees one without the other.
    pub fn sign_in(&self, user: User, role: Role) -> PersistTicket {
        let mut state = self.state();
        let ticket = match serde_json::to_string(&user) {
            Ok(json) => self.writer.set_many(vec![
                (USER_KEY.to_string(), json),
                (ROLE_KEY.to_string(), role.as_str().to_string()),
            ]),
            Err(e) => {
                warn!(error = %e, "Could not serialize user, only role persisted");
                self.writer.set(ROLE_KEY, role.as_str())
            }
        };
        info!(user_id = %user.id, role = %role, "Signed in");
        state.user = Some(user);
        state.role = Some(role);
        ticket
    }

    /// Clears the session and the owner's data. The catalog is kept.
    pub fn logout(&self) -> PersistTicket {
        let mut state = self.state();
        let ticket = self
            .writer
            .remove_many(vec![USER_KEY.to_string(), ROLE_KEY.to_string()]);

        state.user = None;
        state.role = None;
        state.cars.clear();
        state.bookings.clear();
        info!("Signed out");
        ticket
    }

    /// Restores user and role from storage.
    ///
    /// The session is restored only when both keys are present and parse;
    /// a half session is logged and dropped so user and role stay paired.
    /// Unreadable storage is logged and otherwise ignored.
    pub async fn initialize(&self) {
        let entries = match self.writer.load(&[USER_KEY, ROLE_KEY]).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                return;
            }
        };

        let mut user = None;
        let mut role = None;
        for (key, value) in entries {
            let Some(raw) = value else { continue };
            match key.as_str() {
                USER_KEY => match parse_user(&raw) {
                    Ok(u) => user = Some(u),
                    Err(e) => warn!(error = %e, "Ignoring persisted user"),
                },
                ROLE_KEY => match parse_role(&raw) {
                    Ok(r) => role = Some(r),
                    Err(e) => warn!(error = %e, "Ignoring persisted role"),
                },
                _ => {}
            }
        }

        let mut state = self.state();
        match (user, role) {
            (Some(user), Some(role)) => {
                state.user = Some(user);
                state.role = Some(role);
            }
            (None, None) => {}
            (user, role) => {
                warn!(
                    has_user = user.is_some(),
                    has_role = role.is_some(),
                    "Ignoring incomplete persisted session"
                );
            }
        }
        info!(
            authenticated = state.user.is_some(),
            role = ?state.role,
            "Session restored"
        );
    }

    /// Waits until every write queued so far has been applied.
    pub async fn flush(&self) -> StoreResult<()> {
        self.writer.flush().await
    }

    /// Drains pending writes and stops the writer. In-memory state stays
    /// usable but further changes are no longer persisted.
    pub async fn shutdown(&self) -> StoreResult<()> {
        self.writer.shutdown().await
    }

    // =========================================================================
    // Cars
    // =========================================================================

    pub fn set_cars(&self, cars: Vec<Car>) {
        debug!(count = cars.len(), "Owner cars replaced");
        self.state().cars = cars;
    }

    pub fn set_all_cars(&self, cars: Vec<Car>) {
        debug!(count = cars.len(), "Catalog replaced");
        self.state().all_cars = cars;
    }

    /// Appends to the owner's cars. Ids are not checked for duplicates.
    pub fn add_car(&self, car: Car) {
        debug!(car_id = %car.id, "Car added");
        self.state().cars.push(car);
    }

    /// Merges `patch` into every owner car with `id`. Unknown ids are a no-op.
    pub fn update_car(&self, id: &str, patch: CarPatch) {
        let mut state = self.state();
        let mut updated = 0;
        for car in state.cars.iter_mut().filter(|c| c.id == id) {
            car.apply(&patch);
            updated += 1;
        }
        debug!(car_id = %id, updated, "Car update");
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    pub fn add_booking(&self, booking: Booking) {
        debug!(booking_id = %booking.id, car_id = %booking.car_id, "Booking added");
        self.state().bookings.push(booking);
    }

    /// Merges `patch` into every booking with `id`. Unknown ids are a no-op.
    pub fn update_booking(&self, id: &str, patch: BookingPatch) {
        let mut state = self.state();
        let mut updated = 0;
        for booking in state.bookings.iter_mut().filter(|b| b.id == id) {
            booking.apply(&patch);
            updated += 1;
        }
        debug!(booking_id = %id, updated, "Booking update");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn user(&self) -> Option<User> {
        self.state().user.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.state().role
    }

    pub fn cars(&self) -> Vec<Car> {
        self.state().cars.clone()
    }

    pub fn all_cars(&self) -> Vec<Car> {
        self.state().all_cars.clone()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.state().bookings.clone()
    }

    /// A consistent copy of the whole state.
    pub fn snapshot(&self) -> StoreState {
        self.state().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().user.is_some()
    }

    /// Looks in the owner's cars first, then the catalog.
    pub fn find_car(&self, id: &str) -> Option<Car> {
        let state = self.state();
        state
            .cars
            .iter()
            .chain(state.all_cars.iter())
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn find_booking(&self, id: &str) -> Option<Booking> {
        self.state().bookings.iter().find(|b| b.id == id).cloned()
    }

    pub fn bookings_for_renter(&self, user_id: &str) -> Vec<Booking> {
        self.state()
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn bookings_for_owner(&self, owner_id: &str) -> Vec<Booking> {
        self.state()
            .bookings
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// The catalog narrowed by `criteria`, in catalog order.
    pub fn filtered_catalog(&self, criteria: &SearchCriteria) -> Vec<Car> {
        filter_cars(&self.state().all_cars, criteria)
    }
}

fn parse_user(raw: &str) -> StoreResult<User> {
    serde_json::from_str(raw).map_err(|e| StoreError::CorruptValue {
        key: USER_KEY.to_string(),
        reason: e.to_string(),
    })
}

fn parse_role(raw: &str) -> StoreResult<Role> {
    raw.parse().map_err(|e: carhire_core::CoreError| StoreError::CorruptValue {
        key: ROLE_KEY.to_string(),
        reason: e.to_string(),
    })
}
