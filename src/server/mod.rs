//! Income prediction server module
//!
//! REST API around the inference engine. Encoding tables and the model are
//! loaded once at startup; a broken configuration stops the process before
//! it starts listening.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::PredictionInput;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{InferenceError, Result};
use crate::inference::{InferenceConfig, InferenceEngine};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub inference: InferenceConfig,
}

impl ServerConfig {
    /// Read `API_HOST`, `API_PORT` and the inference settings from the
    /// environment. Unparseable values fail instead of falling back.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("API_PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 8000,
        };
        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            inference: InferenceConfig::from_env()?,
        })
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| InferenceError::Config(format!("API_PORT must be a port number, got '{}'", raw)))
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        model_path = %config.inference.model_path.display(),
        model_docs_dir = %config.inference.model_docs_dir.display(),
        max_missing_ratio = config.inference.preprocessing.max_missing_ratio,
        "Loading encoding tables and model"
    );
    let engine = InferenceEngine::load(&config.inference)?;

    let state = Arc::new(AppState::new(config.clone(), engine));
    let start_time = state.started_at;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        started_at = %start_time.to_rfc3339(),
        "Income inference server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(uptime_secs = uptime.num_seconds(), "Shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        if std::env::var("API_PORT").is_err() && std::env::var("MAX_MISSING_RATIO").is_err() {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.port, 8000);
            assert!(!config.host.is_empty());
        }
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert!(matches!(parse_port("eighty"), Err(InferenceError::Config(_))));
        assert!(parse_port("70000").is_err());
    }
}
