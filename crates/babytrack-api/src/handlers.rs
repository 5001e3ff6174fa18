//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/healthz` | Liveness probe |
//! | `GET` | `/v1/babies` | List tracked babies |
//! | `POST` | `/v1/babies/{id}/events` | Record a diaper, nursing, or sleep event |
//! | `GET` | `/v1/profile` | Static caregiver profile |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use babytrack_core::parse::parse_baby_id;
use babytrack_core::{BabyStore, IngestError, RawEvent};
use babytrack_types::Profile;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    /// The response payload.
    pub data: T,
}

// ---------------------------------------------------------------------------
// GET /healthz
// ---------------------------------------------------------------------------

/// Report that the process is up.
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// GET /v1/babies
// ---------------------------------------------------------------------------

/// List all tracked babies in ascending id order.
pub async fn list_babies<S: BabyStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let babies = state.ingestion.list_babies().await?;
    Ok(Json(Data { data: babies }))
}

// ---------------------------------------------------------------------------
// POST /v1/babies/{id}/events
// ---------------------------------------------------------------------------

/// Validate and store one event for a baby.
///
/// The baby id is checked before the body is decoded, so a bad id wins
/// over a bad body.
pub async fn create_event<S: BabyStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(baby_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    parse_baby_id(&baby_id).map_err(IngestError::from)?;

    let raw: RawEvent = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(baby_id = %baby_id, error = %e, "undecodable event body");
        ApiError::InvalidJson(e.to_string())
    })?;

    let stored = state.ingestion.create_event(&baby_id, &raw).await?;
    Ok((StatusCode::CREATED, Json(Data { data: stored })))
}

// ---------------------------------------------------------------------------
// GET /v1/profile
// ---------------------------------------------------------------------------

/// Return the mock caregiver profile.
pub async fn profile() -> impl IntoResponse {
    Json(Profile::mock())
}
