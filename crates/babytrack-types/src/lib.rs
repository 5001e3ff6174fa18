//! Shared type definitions for the Baby Tracker backend.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Wire types flow to `TypeScript` via `ts-rs` for clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for baby and event identifiers
//! - [`enums`] -- Event kinds and per-variant enumerations
//! - [`structs`] -- Babies, event payloads, stored events, profile

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DiaperContents, EventKind, NursingSide};
pub use ids::{BabyId, EventId};
pub use structs::{
    Baby, DiaperDetails, EventPayload, NursingDetails, Profile, SleepDetails, StoredEvent,
};
