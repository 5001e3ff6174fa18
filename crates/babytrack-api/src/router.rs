//! Axum router construction for the API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use babytrack_core::BabyStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /healthz` -- liveness probe
/// - `GET /v1/babies` -- list tracked babies
/// - `POST /v1/babies/{id}/events` -- record a caregiving event
/// - `GET /v1/profile` -- static caregiver profile
///
/// CORS allows any origin; the mobile and web clients call the API
/// directly.
pub fn build_router<S: BabyStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/v1/babies", get(handlers::list_babies::<S>))
        .route("/v1/babies/{id}/events", post(handlers::create_event::<S>))
        .route("/v1/profile", get(handlers::profile))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
