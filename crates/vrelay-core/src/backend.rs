//! Collaborator seams for the two detection backends.

use async_trait::async_trait;
use vrelay_models::{DetectionBatch, PrimaryResponse};

use crate::error::SpecialistResult;

/// Fast general-purpose object detector consulted on every request.
///
/// Implementations must not fail: transport, HTTP and timeout errors are
/// reported as [`PrimaryResponse::failed`].
#[async_trait]
pub trait PrimaryDetector: Send + Sync {
    /// Run detection on an encoded image.
    async fn detect(&self, image: &[u8]) -> PrimaryResponse;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Slow, resource-heavy classifier consulted only when triggered.
///
/// `classify` is a blocking unit of work. It decodes the image and manages
/// any temporary storage itself, and is always called from a blocking worker
/// thread behind the orchestrator's concurrency gate.
pub trait SpecialistClassifier: Send + Sync {
    /// Classify an encoded image.
    fn classify(&self, image: &[u8]) -> SpecialistResult<DetectionBatch>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
