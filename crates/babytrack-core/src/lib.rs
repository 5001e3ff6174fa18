//! Event ingestion core for the Baby Tracker backend.
//!
//! Converts loosely-typed event requests into validated, strongly-typed
//! payloads and hands them to a storage backend. Nothing here knows
//! about HTTP or SQL.
//!
//! # Pipeline
//!
//! ```text
//! RawEvent --parse--> ParsedFields --validate--> ValidatedEvent --store--> StoredEvent
//! ```
//!
//! # Modules
//!
//! - [`parse`] -- Timestamp, enum, whole-number, and id parsing
//! - [`validation`] -- Per-variant required/forbidden fields and invariants
//! - [`ingest`] -- [`IngestionService`] orchestration and error classes
//! - [`store`] -- [`BabyStore`] persistence contract
//! - [`config`] -- Service configuration loading
//!
//! [`IngestionService`]: ingest::IngestionService
//! [`BabyStore`]: store::BabyStore

pub mod config;
pub mod ingest;
pub mod parse;
pub mod store;
pub mod validation;

// Re-export primary types for convenience.
pub use config::{ConfigError, ServiceConfig};
pub use ingest::{ErrorClass, IngestError, IngestionService, prepare_event};
pub use parse::{Field, ParseError, ParsedFields, RawEvent};
pub use store::{BabyStore, StoreError};
pub use validation::{ValidatedEvent, ValidationError, validate};
