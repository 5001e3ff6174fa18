//! Event ingestion: parse, validate, then store.
//!
//! [`IngestionService`] is the HTTP-independent core behind
//! `POST /v1/babies/{id}/events`. Every parse or validation failure
//! returns before the store is touched, so backends only ever see
//! [`ValidatedEvent`]s. The service keeps no state between calls and
//! makes at most one storage call per request.
//!
//! Cancellation is by drop: the storage future is awaited inline (never
//! spawned), so dropping the ingestion future drops the storage call.

use babytrack_types::{Baby, BabyId, StoredEvent};
use tracing::{debug, error, info, warn};

use crate::parse::{ParseError, ParsedFields, RawEvent, parse_baby_id};
use crate::store::{BabyStore, StoreError};
use crate::validation::{
    ValidatedEvent, ValidationError, check_shape, is_legal, resolve_kind, validate,
};

/// How the transport layer should treat an ingestion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller must fix the request. Never retryable.
    BadInput,
    /// Infrastructure failed. Opaque to the caller.
    StorageFailure,
}

/// Errors returned by [`IngestionService::create_event`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A raw value could not be parsed (including the baby id).
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Parsed fields violate the variant's schema or invariants.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store rejected or failed the write.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl IngestError {
    /// Classify the error for the transport layer.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Parse(_) | Self::Validation(_) => ErrorClass::BadInput,
            Self::Storage(_) => ErrorClass::StorageFailure,
        }
    }

    /// Name of the offending request field, if any.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Parse(e) => e.field(),
            Self::Validation(e) => e.field(),
            Self::Storage(_) => None,
        }
    }
}

/// Turn a raw request into a storable event without touching storage.
///
/// Order: baby id, then kind, then field presence, and only then the
/// values of the fields the kind accepts.
pub fn prepare_event(
    raw_baby_id: &str,
    raw: &RawEvent,
) -> Result<(BabyId, ValidatedEvent), IngestError> {
    let baby_id = parse_baby_id(raw_baby_id)?;
    let kind = resolve_kind(&raw.kind)?;
    check_shape(kind, raw)?;
    let fields = ParsedFields::parse_only(raw, |field| is_legal(kind, field))?;
    let event = validate(kind.as_str(), &fields)?;
    Ok((baby_id, event))
}

/// Orchestrates parsing, validation, and the single storage call.
#[derive(Debug, Clone)]
pub struct IngestionService<S> {
    store: S,
}

impl<S: BabyStore> IngestionService<S> {
    /// Create a service writing to `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// List tracked babies, ascending by id.
    pub async fn list_babies(&self) -> Result<Vec<Baby>, StoreError> {
        self.store.list_babies().await.inspect_err(|e| {
            error!(error = %e, "list babies failed");
        })
    }

    /// Validate and store one event for the baby named by `raw_baby_id`.
    pub async fn create_event(
        &self,
        raw_baby_id: &str,
        raw: &RawEvent,
    ) -> Result<StoredEvent, IngestError> {
        let (baby_id, event) = prepare_event(raw_baby_id, raw).inspect_err(|e| {
            warn!(
                baby_id = raw_baby_id,
                kind = raw.kind.as_str(),
                field = e.field(),
                error = %e,
                "event rejected"
            );
        })?;

        debug!(%baby_id, kind = %event.kind(), "event validated");

        let stored = self
            .store
            .create_event(baby_id, &event)
            .await
            .inspect_err(|e| {
                error!(%baby_id, kind = %event.kind(), error = %e, "event storage failed");
            })?;

        info!(
            event_id = %stored.id,
            %baby_id,
            kind = %event.kind(),
            "event stored"
        );
        Ok(stored)
    }
}
