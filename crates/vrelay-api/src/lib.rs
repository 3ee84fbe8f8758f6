//! Axum HTTP server for the detection relay.
//!
//! This crate provides:
//! - A CodeProject.AI-compatible detection endpoint
//! - Liveness and readiness checks
//! - Request IDs, request logging and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppState, DependencyCheck};
