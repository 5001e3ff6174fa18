//! Backend selection for the storage layer.
//!
//! [`Store`] dispatches to one concrete backend so the composition root can
//! choose `PostgreSQL` or memory from configuration while handlers stay
//! generic over [`BabyStore`].

use babytrack_core::{BabyStore, StoreError, ValidatedEvent};
use babytrack_types::{Baby, BabyId, StoredEvent};

use crate::error::DbError;
use crate::memory::MemoryStore;
use crate::pg_store::PgBabyStore;

/// A storage backend chosen at startup.
#[derive(Debug, Clone)]
pub enum Store {
    /// Durable `PostgreSQL` storage.
    Postgres(PgBabyStore),
    /// Process-local storage.
    Memory(MemoryStore),
}

impl Store {
    /// Short backend name for logs.
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Insert `names` as babies only if the store has none.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend write fails.
    pub async fn seed_if_empty(&self, names: &[&str]) -> Result<u64, DbError> {
        match self {
            Self::Postgres(store) => store.seed_if_empty(names).await,
            Self::Memory(store) => store.seed_if_empty(names).await,
        }
    }

    /// Events recorded for one baby.
    ///
    /// Read-back for tests and operator inspection; no endpoint serves it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend read fails.
    #[doc(hidden)]
    pub async fn events_for_baby(&self, baby_id: BabyId) -> Result<Vec<StoredEvent>, DbError> {
        match self {
            Self::Postgres(store) => store.fetch_events_for_baby(baby_id).await,
            Self::Memory(store) => Ok(store.events_for_baby(baby_id).await),
        }
    }
}

impl From<PgBabyStore> for Store {
    fn from(store: PgBabyStore) -> Self {
        Self::Postgres(store)
    }
}

impl From<MemoryStore> for Store {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl BabyStore for Store {
    async fn list_babies(&self) -> Result<Vec<Baby>, StoreError> {
        match self {
            Self::Postgres(store) => store.list_babies().await,
            Self::Memory(store) => store.list_babies().await,
        }
    }

    async fn create_event(
        &self,
        baby_id: BabyId,
        event: &ValidatedEvent,
    ) -> Result<StoredEvent, StoreError> {
        match self {
            Self::Postgres(store) => store.create_event(baby_id, event).await,
            Self::Memory(store) => store.create_event(baby_id, event).await,
        }
    }
}
