//! Server binary for the Baby Tracker backend.
//!
//! Loads configuration, wires storage into the HTTP API, and serves until
//! `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`BABYTRACK_CONFIG`, else `babytrack.yaml`, else
//!    defaults), with environment overrides
//! 2. Initialize structured logging (tracing)
//! 3. Open the configured store (`PostgreSQL` runs migrations first)
//! 4. Seed the default babies into an empty store, if enabled
//! 5. Serve HTTP until `Ctrl-C`
//! 6. Close the database pool

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use babytrack_api::{AppState, ServerConfig};
use babytrack_core::ServiceConfig;
use babytrack_core::config::{LogFormat, LoggingConfig, StorageBackend, StorageConfig};
use babytrack_db::{MemoryStore, PgBabyStore, PostgresPool, Store};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

/// Config file read when `BABYTRACK_CONFIG` is unset.
const DEFAULT_CONFIG_FILE: &str = "babytrack.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the server stops
/// abnormally.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path(|name| std::env::var(name).ok());
    let config = load_config(config_path.as_deref())?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        config_file = ?config_path,
        backend = ?config.storage.backend,
        "babytrack-server starting"
    );

    // 3. Open storage.
    let (store, pool) = open_store(&config.storage).await?;

    // 4. Seed default data.
    if config.storage.seed_on_empty {
        babytrack_db::seed_default_babies(&store)
            .await
            .map_err(StartupError::from)?;
    } else {
        info!("Seeding disabled");
    }

    // 5. Serve.
    let server_config = ServerConfig::from(&config.server);
    let state = Arc::new(AppState::new(store));
    let served = babytrack_api::start_server(&server_config, state).await;

    // 6. Release the pool whether or not serving succeeded.
    if let Some(pool) = pool {
        pool.close().await;
    }
    served.map_err(StartupError::from)?;

    info!("babytrack-server shutdown complete");
    Ok(())
}

/// Pick the config file: `BABYTRACK_CONFIG` if set, else
/// [`DEFAULT_CONFIG_FILE`] when it exists, else none.
fn config_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    match lookup("BABYTRACK_CONFIG") {
        Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
        _ => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ServiceConfig, StartupError> {
    let config = match path {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::from_env()?,
    };
    Ok(config)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| StartupError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?;

    let installed = match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| StartupError::Logging {
        message: e.to_string(),
    })
}

/// Open the configured backend. Returns the pool separately so `main`
/// can close it on shutdown.
async fn open_store(
    storage: &StorageConfig,
) -> Result<(Store, Option<PostgresPool>), StartupError> {
    match storage.backend {
        StorageBackend::Postgres => {
            let pool = PostgresPool::open(storage).await?;
            let store = Store::from(PgBabyStore::new(pool.pool().clone()));
            Ok((store, Some(pool)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on exit");
            Ok((Store::from(MemoryStore::new()), None))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use babytrack_core::BabyStore;

    use super::*;

    #[test]
    fn explicit_config_path_wins() {
        let path = config_path(|name| {
            (name == "BABYTRACK_CONFIG").then(|| "/etc/babytrack/prod.yaml".to_owned())
        });
        assert_eq!(path, Some(PathBuf::from("/etc/babytrack/prod.yaml")));
    }

    #[test]
    fn blank_config_path_is_ignored() {
        let path = config_path(|_| Some("  ".to_owned()));
        assert_ne!(path, Some(PathBuf::from("  ")));
    }

    #[tokio::test]
    async fn memory_backend_opens_without_a_pool() {
        let storage = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let (store, pool) = open_store(&storage).await.unwrap();
        assert!(pool.is_none());
        assert_eq!(store.backend_name(), "memory");
        assert!(store.list_babies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn postgres_backend_requires_url() {
        let err = open_store(&StorageConfig::default()).await.unwrap_err();
        assert!(matches!(err, StartupError::Storage { .. }));
    }
}
