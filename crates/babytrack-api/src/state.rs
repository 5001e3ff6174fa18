//! Shared application state for the API server.

use babytrack_core::{BabyStore, IngestionService};

/// State shared by every handler: the ingestion service and its store.
#[derive(Debug)]
pub struct AppState<S> {
    /// Parses, validates, and stores events; lists babies.
    pub ingestion: IngestionService<S>,
}

impl<S: BabyStore> AppState<S> {
    /// Wrap a store in a fresh ingestion service.
    pub const fn new(store: S) -> Self {
        Self {
            ingestion: IngestionService::new(store),
        }
    }
}
