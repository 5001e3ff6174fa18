//! Error types for the storage layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] and [`serde_json`] errors. At the ingestion boundary they are
//! flattened into the core's [`StoreError`].

use babytrack_core::StoreError;
use babytrack_types::BabyId;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A payload could not be converted to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The referenced baby does not exist.
    #[error("Unknown baby: {0}")]
    UnknownBaby(BabyId),

    /// A stored row could not be turned back into a domain value.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// An identifier sequence ran out of values.
    #[error("Identifier space exhausted")]
    IdExhausted,

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UnknownBaby(id) => Self::UnknownBaby(id),
            other => Self::Backend(other.to_string()),
        }
    }
}
