//! HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the Axum
//! server until `Ctrl-C` is received, letting in-flight requests finish.

use std::net::SocketAddr;
use std::sync::Arc;

use babytrack_core::BabyStore;
use babytrack_core::config::ServerSection;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSection::default())
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port,
        }
    }
}

/// Start the HTTP server.
///
/// Binds to the configured address, builds the router, and serves
/// requests until `Ctrl-C`. Returns `Ok(())` on clean shutdown.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server<S: BabyStore + 'static>(
    config: &ServerConfig,
    state: Arc<AppState<S>>,
) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C; shutting down"),
    }
}

/// Errors that can occur when starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use babytrack_core::{StoreError, ValidatedEvent};
    use babytrack_types::{Baby, BabyId, StoredEvent};

    use super::*;

    struct EmptyStore;

    impl BabyStore for EmptyStore {
        async fn list_babies(&self) -> Result<Vec<Baby>, StoreError> {
            Ok(Vec::new())
        }

        async fn create_event(
            &self,
            baby_id: BabyId,
            _event: &ValidatedEvent,
        ) -> Result<StoredEvent, StoreError> {
            Err(StoreError::UnknownBaby(baby_id))
        }
    }

    #[test]
    fn error_messages_name_the_stage_once() {
        let err = ServerError::Serve(std::io::Error::other("connection reset").to_string());
        assert_eq!(err.to_string(), "serve error: connection reset");

        let err = ServerError::Bind("invalid address: oops".to_owned());
        assert_eq!(err.to_string(), "bind error: invalid address: oops");
    }

    #[tokio::test]
    async fn unparseable_host_is_a_bind_error() {
        let config = ServerConfig {
            host: "not a host".to_owned(),
            port: 8080,
        };
        let err = start_server(&config, Arc::new(AppState::new(EmptyStore)))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("bind error: invalid address:"), "{message}");
        assert_eq!(message.matches("error:").count(), 1, "{message}");
    }
}
