//! API configuration.

use std::net::SocketAddr;

use thiserror::Error;
use vrelay_core::CoreError;
use vrelay_detector_client::DetectorError;
use vrelay_specialist::ClassifierError;

/// Startup configuration failure. Fatal for the binary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid orchestrator configuration: {0}")]
    Orchestrator(#[from] CoreError),

    #[error("Detector client could not be built: {0}")]
    Detector(#[from] DetectorError),

    #[error("Specialist client could not be built: {0}")]
    Specialist(#[from] ClassifierError),

    #[error("Invalid bind address: {0}")]
    BindAddress(String),

    #[error("Metrics recorder could not be installed: {0}")]
    Metrics(String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Max request body size
    pub max_body_size: usize,
    /// Expose Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_body_size: 20 * 1024 * 1024, // 20MB
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20 * 1024 * 1024),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::BindAddress(format!("{}:{}", self.host, self.port)))
    }
}
