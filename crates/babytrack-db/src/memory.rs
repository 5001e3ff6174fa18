//! In-process implementation of the [`BabyStore`] contract.
//!
//! Backs tests and local runs without a database. Behaves like the
//! `PostgreSQL` store where it matters to callers: ids start at 1 and are
//! never reused, babies list in id order, and events for an unknown baby
//! are rejected the way the foreign key rejects them.

use std::collections::BTreeMap;
use std::sync::Arc;

use babytrack_core::{BabyStore, StoreError, ValidatedEvent};
use babytrack_types::{Baby, BabyId, EventId, StoredEvent};
use tokio::sync::RwLock;

use crate::error::DbError;

#[derive(Debug, Default)]
struct MemoryState {
    babies: BTreeMap<BabyId, String>,
    events: Vec<StoredEvent>,
    last_baby_id: i64,
    last_event_id: i64,
}

impl MemoryState {
    fn next_baby_id(&mut self) -> Result<BabyId, DbError> {
        self.last_baby_id = self.last_baby_id.checked_add(1).ok_or(DbError::IdExhausted)?;
        Ok(BabyId::new(self.last_baby_id))
    }

    fn next_event_id(&mut self) -> Result<EventId, DbError> {
        self.last_event_id = self
            .last_event_id
            .checked_add(1)
            .ok_or(DbError::IdExhausted)?;
        Ok(EventId::new(self.last_event_id))
    }
}

/// Shared, clonable in-memory store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a baby and return its assigned id. Test setup; startup seeds
    /// through [`MemoryStore::seed_if_empty`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::IdExhausted`] if the id space is used up.
    #[doc(hidden)]
    pub async fn insert_baby(&self, name: &str) -> Result<Baby, DbError> {
        let mut state = self.state.write().await;
        let id = state.next_baby_id()?;
        state.babies.insert(id, name.to_owned());
        Ok(Baby {
            id,
            name: name.to_owned(),
        })
    }

    /// Insert `names` as babies, in order, only if no baby exists yet.
    ///
    /// Returns the number of babies inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::IdExhausted`] if the id space is used up.
    pub async fn seed_if_empty(&self, names: &[&str]) -> Result<u64, DbError> {
        let mut state = self.state.write().await;
        if !state.babies.is_empty() {
            return Ok(0);
        }
        let mut inserted = 0_u64;
        for name in names {
            let id = state.next_baby_id()?;
            state.babies.insert(id, (*name).to_owned());
            inserted = inserted.saturating_add(1);
        }
        Ok(inserted)
    }

    /// All babies, ascending by id.
    pub async fn babies(&self) -> Vec<Baby> {
        let state = self.state.read().await;
        state
            .babies
            .iter()
            .map(|(id, name)| Baby {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    /// Events recorded for one baby, in insertion order. Read-back for
    /// tests; no endpoint serves it.
    #[doc(hidden)]
    pub async fn events_for_baby(&self, baby_id: BabyId) -> Vec<StoredEvent> {
        let state = self.state.read().await;
        state
            .events
            .iter()
            .filter(|event| event.baby_id == baby_id)
            .cloned()
            .collect()
    }

    /// Record an event, assigning the next id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownBaby`] if `baby_id` is not stored, or
    /// [`DbError::IdExhausted`] if the id space is used up.
    pub async fn insert_event(
        &self,
        baby_id: BabyId,
        event: &ValidatedEvent,
    ) -> Result<StoredEvent, DbError> {
        let mut state = self.state.write().await;
        if !state.babies.contains_key(&baby_id) {
            return Err(DbError::UnknownBaby(baby_id));
        }
        let stored = StoredEvent {
            id: state.next_event_id()?,
            baby_id,
            payload: event.payload().clone(),
        };
        state.events.push(stored.clone());
        Ok(stored)
    }
}

impl BabyStore for MemoryStore {
    async fn list_babies(&self) -> Result<Vec<Baby>, StoreError> {
        Ok(self.babies().await)
    }

    async fn create_event(
        &self,
        baby_id: BabyId,
        event: &ValidatedEvent,
    ) -> Result<StoredEvent, StoreError> {
        Ok(self.insert_event(baby_id, event).await?)
    }
}
