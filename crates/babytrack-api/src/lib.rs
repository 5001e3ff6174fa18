//! HTTP API for the Baby Tracker backend.
//!
//! A thin Axum layer over [`IngestionService`]: it decodes requests,
//! delegates to the core, and maps results onto status codes.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Event stored | `201` |
//! | Bad baby id, malformed JSON, parse or validation error | `400` |
//! | Storage failure | `500` (generic body, detail logged) |
//!
//! [`IngestionService`]: babytrack_core::IngestionService

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
