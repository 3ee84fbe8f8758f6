//! Detection relay server binary.

use std::sync::Arc;

use tracing::{error, info, warn};

use vrelay_api::logging::{init_tracing, LogSettings};
use vrelay_api::{create_router, metrics, ApiConfig, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let service_flag = std::env::args().skip(1).any(|arg| arg == "--service");
    let log_settings = LogSettings::from_env(service_flag);
    let _log_guard = init_tracing(&log_settings);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        service_mode = log_settings.service_mode,
        "Starting vrelay-server"
    );

    let config = ApiConfig::from_env();
    info!("API config: host={}, port={}", config.host, config.port);

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::from_env(config.clone()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create application state: {}", e);
            std::process::exit(1);
        }
    };
    let orchestrator = Arc::clone(&state.orchestrator);

    let metrics_handle = if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                Some(handle)
            }
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let app = create_router(state, metrics_handle);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    if orchestrator.gate().is_busy() {
        info!("Waiting for the running specialist call to finish");
    }
    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
