//! The persistence contract the ingestion core depends on.
//!
//! [`BabyStore`] is implemented by the storage crate (`PostgreSQL` and
//! in-memory). Methods return `Send` futures so handlers built on top of
//! them can run on a multi-threaded runtime.

use std::future::Future;

use babytrack_types::{Baby, BabyId, StoredEvent};

use crate::validation::ValidatedEvent;

/// Failures reported by a storage backend.
///
/// The core treats every variant as an opaque storage failure; the
/// variants exist for logging and for backends to report precisely.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The event referenced a baby the store does not know.
    #[error("baby {0} does not exist")]
    UnknownBaby(BabyId),

    /// Any other backend failure (connection, query, serialization).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Storage capability consumed by [`IngestionService`].
///
/// Guarantees expected of implementations:
/// - `list_babies` returns babies in ascending id order.
/// - `create_event` assigns a fresh, never-reused id exactly once and
///   returns the stored payload unchanged.
///
/// [`IngestionService`]: crate::ingest::IngestionService
pub trait BabyStore: Send + Sync {
    /// All tracked babies, ascending by id.
    fn list_babies(&self) -> impl Future<Output = Result<Vec<Baby>, StoreError>> + Send;

    /// Durably record a validated event for `baby_id`.
    fn create_event(
        &self,
        baby_id: BabyId,
        event: &ValidatedEvent,
    ) -> impl Future<Output = Result<StoredEvent, StoreError>> + Send;
}
