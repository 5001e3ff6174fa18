//! `PostgreSQL` implementation of the [`BabyStore`] contract.
//!
//! Events live in a single `events` table. The variant payload is stored
//! in the `details` JSONB column with its `type` tag lifted into the
//! `type` column, and `occurred_at` holds the instant the event is filed
//! under (change time for diapers, range start otherwise).

use babytrack_core::{BabyStore, StoreError, ValidatedEvent};
use babytrack_types::{Baby, BabyId, EventId, EventPayload, StoredEvent};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::error::DbError;

/// Advisory lock key held while seeding babies ("babytrak" as ASCII).
pub const SEED_LOCK_KEY: i64 = 0x6261_6279_7472_616b;

/// Operations on the `babies` and `events` tables.
#[derive(Debug, Clone)]
pub struct PgBabyStore {
    pool: PgPool,
}

impl PgBabyStore {
    /// Create a store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All babies, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_babies(&self) -> Result<Vec<Baby>, DbError> {
        let rows = sqlx::query_as::<_, BabyRow>(
            r"SELECT id, name
              FROM babies
              ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Baby::from).collect())
    }

    /// Insert one validated event and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownBaby`] if `baby_id` violates the foreign
    /// key, [`DbError::Postgres`] for any other database failure.
    pub async fn insert_event(
        &self,
        baby_id: BabyId,
        payload: &EventPayload,
    ) -> Result<StoredEvent, DbError> {
        let details = details_json(payload)?;

        let id: i64 = sqlx::query_scalar(
            r"INSERT INTO events (baby_id, type, occurred_at, details)
              VALUES ($1, $2, $3, $4)
              RETURNING id",
        )
        .bind(baby_id.into_inner())
        .bind(payload.kind().as_str())
        .bind(payload.occurred_at())
        .bind(&details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                DbError::UnknownBaby(baby_id)
            }
            other => DbError::Postgres(other),
        })?;

        tracing::debug!(event_id = id, %baby_id, kind = %payload.kind(), "Inserted event");

        Ok(StoredEvent {
            id: EventId::new(id),
            baby_id,
            payload: payload.clone(),
        })
    }

    /// Events recorded for one baby, oldest first.
    ///
    /// Read-back for tests and operator inspection; no endpoint serves it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::CorruptRow`] if a stored payload no longer decodes.
    #[doc(hidden)]
    pub async fn fetch_events_for_baby(
        &self,
        baby_id: BabyId,
    ) -> Result<Vec<StoredEvent>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, baby_id, type AS event_type, occurred_at, details, created_at
              FROM events
              WHERE baby_id = $1
              ORDER BY occurred_at, id",
        )
        .bind(baby_id.into_inner())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StoredEvent::try_from).collect()
    }

    /// Insert `names` as babies, in order, only if no baby exists yet.
    ///
    /// Concurrent callers serialize on a transaction-scoped advisory lock,
    /// so only the first one to commit inserts anything. Returns the number
    /// of babies inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the lock or the insert fails.
    pub async fn seed_if_empty(&self, names: &[&str]) -> Result<u64, DbError> {
        let names: Vec<String> = names.iter().map(|n| (*n).to_owned()).collect();

        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r"INSERT INTO babies (name)
              SELECT s.name
              FROM UNNEST($1::TEXT[]) WITH ORDINALITY AS s(name, ord)
              WHERE NOT EXISTS (SELECT 1 FROM babies)
              ORDER BY s.ord",
        )
        .bind(&names)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }
}

impl BabyStore for PgBabyStore {
    async fn list_babies(&self) -> Result<Vec<Baby>, StoreError> {
        Ok(self.fetch_babies().await?)
    }

    async fn create_event(
        &self,
        baby_id: BabyId,
        event: &ValidatedEvent,
    ) -> Result<StoredEvent, StoreError> {
        Ok(self.insert_event(baby_id, event.payload()).await?)
    }
}

/// A row from the `babies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BabyRow {
    /// Auto-incremented baby ID.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl From<BabyRow> for Baby {
    fn from(row: BabyRow) -> Self {
        Self {
            id: BabyId::new(row.id),
            name: row.name,
        }
    }
}

/// A row from the `events` table, as read back by
/// [`PgBabyStore::fetch_events_for_baby`].
///
/// Uses runtime types rather than compile-time checked types to
/// avoid requiring a live database during builds.
#[doc(hidden)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Auto-incremented event ID.
    pub id: i64,
    /// Owning baby.
    pub baby_id: i64,
    /// Variant tag (`diaper`, `nursing`, `sleep`).
    pub event_type: String,
    /// Change time or range start.
    pub occurred_at: DateTime<Utc>,
    /// Variant payload without its tag.
    pub details: Value,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for StoredEvent {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = row.details else {
            return Err(DbError::CorruptRow(format!(
                "event {} details are not an object",
                row.id
            )));
        };
        fields.insert("type".to_owned(), Value::String(row.event_type));
        let payload: EventPayload = serde_json::from_value(Value::Object(fields))?;

        Ok(Self {
            id: EventId::new(row.id),
            baby_id: BabyId::new(row.baby_id),
            payload,
        })
    }
}

/// Serialize a payload for the `details` column, minus its `type` tag.
fn details_json(payload: &EventPayload) -> Result<Value, DbError> {
    let mut value = serde_json::to_value(payload)?;
    if let Value::Object(ref mut fields) = value {
        fields.remove("type");
    }
    Ok(value)
}
