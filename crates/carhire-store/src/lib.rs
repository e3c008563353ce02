//! # carhire-store: Client Application Store
//!
//! In-memory state shared by every screen of the rental client, with the
//! session mirrored to a key-value backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Screens (browse, book, list a car, profile)                           │
//! │        │ read / mutate                                                  │
//! │        ▼                                                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  carhire-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   AppStore ──► StoreState (Mutex)                               │   │
//! │  │      │                                                          │   │
//! │  │      └──► PersistHandle ──► PersistWriter (task) ──► KeyValueStore  │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                    │                    │
//! │                                 MemoryKv ◄─────────┴────► carhire-db    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use carhire_store::{AppStore, StoreConfig};
//!
//! let store = Arc::new(AppStore::new(Arc::new(db.kv()), &StoreConfig::from_env()));
//! store.initialize().await;
//! store.sign_in(user, Role::Renter);
//! ```

pub mod config;
pub mod error;
pub mod kv;
pub mod persist;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryKv};
pub use persist::{PersistHandle, PersistTicket, PersistWriter};
pub use store::{AppStore, StoreState, ROLE_KEY, USER_KEY};
