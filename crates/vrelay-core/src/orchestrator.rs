//! Per-request detection pipeline.
//!
//! ```text
//! START -> PRIMARY_DONE -> SKIP ------------> FILTERED -> FUSED -> DONE
//!                       \-> SPECIALIST_DONE -/
//! ```
//!
//! Every path ends in a successful [`RequestResult`]. Primary failures arrive
//! as empty responses, specialist failures are logged and replaced by an
//! empty batch.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures_util::FutureExt;
use tracing::{info, instrument, warn};
use vrelay_models::{DetectionBatch, PrimaryResponse, RequestResult};

use crate::backend::{PrimaryDetector, SpecialistClassifier};
use crate::config::OrchestratorConfig;
use crate::error::{SpecialistError, SpecialistResult};
use crate::filter::filter_predictions;
use crate::fuse::fuse;
use crate::gate::ConcurrencyGate;
use crate::metrics;
use crate::trigger::first_trigger;

/// Why the specialist was invoked for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Primary detector ran and found nothing
    EmptyPrimary,
    /// Primary detector failed and returned its empty fallback
    PrimaryFailed,
    /// A primary label is in the trigger set
    Label,
}

impl TriggerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerReason::EmptyPrimary => "empty_primary",
            TriggerReason::PrimaryFailed => "primary_failed",
            TriggerReason::Label => "label",
        }
    }
}

impl std::fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composes the primary detector, trigger policy, gated specialist, filter
/// and fuser.
///
/// Construct once at startup and share behind an `Arc`; the only shared
/// mutable resource is the specialist gate.
pub struct DetectionOrchestrator {
    primary: Arc<dyn PrimaryDetector>,
    specialist: Arc<dyn SpecialistClassifier>,
    gate: ConcurrencyGate,
    config: OrchestratorConfig,
}

impl DetectionOrchestrator {
    /// Create a new orchestrator with its own specialist gate.
    pub fn new(
        primary: Arc<dyn PrimaryDetector>,
        specialist: Arc<dyn SpecialistClassifier>,
        config: OrchestratorConfig,
    ) -> Self {
        info!(
            primary = primary.name(),
            specialist = specialist.name(),
            triggers = config.triggers.len(),
            confidence_floor = config.filter.confidence_floor,
            budget = ?config.specialist_budget,
            "Detection orchestrator ready"
        );

        Self {
            primary,
            specialist,
            gate: ConcurrencyGate::new(),
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    pub fn primary(&self) -> &Arc<dyn PrimaryDetector> {
        &self.primary
    }

    /// Process one image. Never fails.
    #[instrument(skip_all, fields(image_bytes = image.len()))]
    pub async fn process(&self, image: Bytes) -> RequestResult {
        let primary = self.detect_primary(&image).await;

        let specialist_batch = match self.trigger_reason(&primary) {
            Some(reason) => self.run_specialist(image, reason).await,
            None => {
                metrics::record_specialist_skipped();
                info!(
                    primary_count = primary.predictions.len(),
                    "No trigger label in primary result, specialist skipped"
                );
                Vec::new()
            }
        };

        let received = specialist_batch.len();
        let survivors = filter_predictions(specialist_batch, &self.config.filter);
        metrics::record_filtered(received - survivors.len());
        if received > 0 {
            info!(
                received,
                survivors = survivors.len(),
                "Specialist predictions filtered"
            );
        }

        RequestResult::success(fuse(primary.predictions, survivors))
    }

    async fn detect_primary(&self, image: &[u8]) -> PrimaryResponse {
        let response = AssertUnwindSafe(self.primary.detect(image))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                warn!(primary = self.primary.name(), "Primary detector panicked");
                PrimaryResponse::failed()
            });

        if !response.success {
            metrics::record_primary_failure();
            warn!(
                primary = self.primary.name(),
                "Primary detector failed, continuing with an empty result"
            );
        }
        response
    }

    fn trigger_reason(&self, primary: &PrimaryResponse) -> Option<TriggerReason> {
        if let Some(hit) = first_trigger(&primary.predictions, &self.config.triggers) {
            info!(label = %hit.label, "Primary detected trigger label, running specialist");
            return Some(TriggerReason::Label);
        }

        // No trigger label matched; only an empty batch still triggers.
        if !primary.predictions.is_empty() {
            return None;
        }

        if primary.success {
            info!("Primary returned no predictions, running specialist");
            Some(TriggerReason::EmptyPrimary)
        } else if self.config.specialist_on_primary_failure {
            info!("Primary unavailable, running specialist");
            Some(TriggerReason::PrimaryFailed)
        } else {
            None
        }
    }

    async fn run_specialist(&self, image: Bytes, reason: TriggerReason) -> DetectionBatch {
        let start = Instant::now();
        match self.invoke_specialist(image).await {
            Ok(batch) => {
                let elapsed = start.elapsed();
                metrics::record_specialist_run(reason.as_str(), elapsed.as_secs_f64());
                info!(
                    reason = %reason,
                    specialist_count = batch.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Specialist finished"
                );
                batch
            }
            Err(e) => {
                metrics::record_specialist_failure(e.kind());
                warn!(
                    specialist = self.specialist.name(),
                    reason = %reason,
                    error = %e,
                    "Specialist failed, continuing without its predictions"
                );
                Vec::new()
            }
        }
    }

    async fn invoke_specialist(&self, image: Bytes) -> SpecialistResult<DetectionBatch> {
        let specialist = Arc::clone(&self.specialist);
        let run = self
            .gate
            .run_exclusively(move || specialist.classify(&image));

        let outcome = match self.config.specialist_budget {
            Some(budget) => tokio::time::timeout(budget, run)
                .await
                .map_err(|_| SpecialistError::BudgetExceeded(budget))?,
            None => run.await,
        };

        outcome?
    }
}
