//! `PostgreSQL` connection pool and schema migrations.
//!
//! Pool settings come straight from the service's [`StorageConfig`], which
//! owns their defaults. Queries are built at runtime (not compile-time
//! checked) so builds never need a live database.

use std::time::Duration;

use babytrack_core::config::StorageConfig;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::DbError;

/// Connection pool handle to `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Connect with the URL and pool limits of `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if no URL is set or it cannot be parsed,
    /// [`DbError::Postgres`] if the connection fails.
    pub async fn connect(storage: &StorageConfig) -> Result<Self, DbError> {
        let connect_options = connect_options(storage)?;
        let pool = pool_options(storage)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            max_connections = storage.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }

    /// Connect, then apply migrations if `storage.run_migrations` is set.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if connecting or migrating fails.
    pub async fn open(storage: &StorageConfig) -> Result<Self, DbError> {
        let pool = Self::connect(storage).await?;
        if storage.run_migrations {
            pool.run_migrations().await?;
        } else {
            tracing::warn!("Migrations disabled; assuming schema is current");
        }
        Ok(pool)
    }

    /// Run all pending migrations from the `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Return a reference to the underlying [`PgPool`].
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

/// Parse the configured URL. A blank URL counts as missing.
fn connect_options(storage: &StorageConfig) -> Result<PgConnectOptions, DbError> {
    let url = storage
        .database_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| DbError::Config("DATABASE_URL is required".to_owned()))?;

    url.parse()
        .map_err(|e: sqlx::Error| DbError::Config(format!("Invalid database URL: {e}")))
}

fn pool_options(storage: &StorageConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(storage.max_connections)
        .acquire_timeout(Duration::from_secs(storage.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(storage.idle_timeout_secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn storage(url: Option<&str>) -> StorageConfig {
        StorageConfig {
            database_url: url.map(str::to_owned),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn storage_section_maps_onto_pool_settings() {
        let storage = StorageConfig {
            max_connections: 3,
            acquire_timeout_secs: 2,
            idle_timeout_secs: 60,
            ..storage(Some("postgres://localhost/babytrack"))
        };

        let options = pool_options(&storage);
        assert_eq!(options.get_max_connections(), 3);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(2));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(60)));

        let connect = connect_options(&storage).unwrap();
        assert_eq!(connect.get_database(), Some("babytrack"));
    }

    #[test]
    fn default_storage_section_sets_the_pool_defaults() {
        let defaults = StorageConfig::default();
        let options = pool_options(&defaults);
        assert_eq!(options.get_max_connections(), defaults.max_connections);
        assert_eq!(
            options.get_acquire_timeout(),
            Duration::from_secs(defaults.acquire_timeout_secs)
        );
        assert_eq!(
            options.get_idle_timeout(),
            Some(Duration::from_secs(defaults.idle_timeout_secs))
        );
    }

    #[test]
    fn missing_or_blank_url_is_a_config_error() {
        for url in [None, Some("  ")] {
            let err = connect_options(&storage(url)).unwrap_err();
            assert!(matches!(err, DbError::Config(_)), "{url:?}");
        }
    }

    #[test]
    fn unparseable_url_is_a_config_error() {
        let err = connect_options(&storage(Some("not a url"))).unwrap_err();
        assert!(matches!(err, DbError::Config(ref msg) if msg.starts_with("Invalid database URL")));
    }
}
