//! One-time initial data.
//!
//! Seeding is an explicit startup step run by the server binary, never by
//! a store constructor, so tests start from an empty store.

use crate::error::DbError;
use crate::store::Store;

/// Babies inserted into an empty store, in id order.
pub const DEFAULT_BABIES: [&str; 3] = ["Alice", "Bob", "Charlie"];

/// Insert [`DEFAULT_BABIES`] if the store holds no babies yet.
///
/// Returns the number of babies inserted (zero when already populated).
///
/// # Errors
///
/// Returns [`DbError`] if the backend write fails.
pub async fn seed_default_babies(store: &Store) -> Result<u64, DbError> {
    let inserted = store.seed_if_empty(&DEFAULT_BABIES).await?;
    if inserted > 0 {
        tracing::info!(inserted, backend = store.backend_name(), "Seeded default babies");
    } else {
        tracing::debug!(backend = store.backend_name(), "Babies present, seed skipped");
    }
    Ok(inserted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use babytrack_core::BabyStore;

    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn seeds_once_in_order() {
        let store = Store::from(MemoryStore::new());

        assert_eq!(seed_default_babies(&store).await.unwrap(), 3);
        assert_eq!(seed_default_babies(&store).await.unwrap(), 0);

        let babies = store.list_babies().await.unwrap();
        let names: Vec<&str> = babies.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, DEFAULT_BABIES);
        assert!(babies.windows(2).all(|w| w.first().map(|b| b.id) < w.get(1).map(|b| b.id)));
    }
}
