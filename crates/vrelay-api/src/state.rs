//! Application state.

use std::sync::Arc;

use async_trait::async_trait;
use vrelay_core::{DetectionOrchestrator, OrchestratorConfig};
use vrelay_detector_client::DetectorClient;
use vrelay_specialist::SpeciesNetClient;

use crate::config::{ApiConfig, ConfigError};

/// Reachability check for a downstream service, used by `/ready`.
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

#[async_trait]
impl DependencyCheck for DetectorClient {
    async fn is_reachable(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<DetectionOrchestrator>,
    pub primary_check: Arc<dyn DependencyCheck>,
}

impl AppState {
    /// Create state from already built collaborators.
    pub fn new(
        config: ApiConfig,
        orchestrator: Arc<DetectionOrchestrator>,
        primary_check: Arc<dyn DependencyCheck>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            primary_check,
        }
    }

    /// Build the detector clients and orchestrator from the environment.
    ///
    /// Must be called inside the tokio runtime; the specialist client binds
    /// to it.
    pub fn from_env(config: ApiConfig) -> Result<Self, ConfigError> {
        let orchestrator_config = OrchestratorConfig::from_env()?;
        let detector = Arc::new(DetectorClient::from_env()?);
        let specialist = Arc::new(SpeciesNetClient::from_env()?);

        let orchestrator = DetectionOrchestrator::new(
            detector.clone(),
            specialist,
            orchestrator_config,
        );

        Ok(Self::new(config, Arc::new(orchestrator), detector))
    }
}
