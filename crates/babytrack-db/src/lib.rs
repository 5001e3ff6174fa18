//! Storage layer for the Baby Tracker backend.
//!
//! Implements the core's [`BabyStore`](babytrack_core::BabyStore) contract
//! twice: on `PostgreSQL` for deployments and in memory for tests and
//! local runs. [`Store`] picks one at startup.
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and migrations
//! - [`pg_store`] -- `babies`/`events` table operations
//! - [`memory`] -- In-process store with the same observable behavior
//! - [`store`] -- Backend dispatch
//! - [`seed`] -- Explicit default-data step
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod pg_store;
pub mod postgres;
pub mod seed;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use memory::MemoryStore;
pub use pg_store::{BabyRow, EventRow, PgBabyStore, SEED_LOCK_KEY};
pub use postgres::PostgresPool;
pub use seed::{DEFAULT_BABIES, seed_default_babies};
pub use store::Store;
