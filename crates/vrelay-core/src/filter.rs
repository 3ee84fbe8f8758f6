//! Specialist result filtering.

use vrelay_models::{Detection, DetectionBatch};

/// What counts as noise in specialist output.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPolicy {
    /// Exact sentinel label meaning "nothing of interest"
    pub blank_label: String,
    /// Predictions scoring below this are dropped
    pub confidence_floor: f64,
}

impl FilterPolicy {
    pub fn new(blank_label: impl Into<String>, confidence_floor: f64) -> Self {
        Self {
            blank_label: blank_label.into(),
            confidence_floor,
        }
    }

    /// Whether a single detection survives the policy.
    ///
    /// The blank check compares the raw label exactly, before any
    /// normalization.
    pub fn keeps(&self, detection: &Detection) -> bool {
        detection.label != self.blank_label && detection.confidence >= self.confidence_floor
    }
}

/// Drop blank-sentinel and below-floor detections, preserving order.
pub fn filter_predictions(batch: DetectionBatch, policy: &FilterPolicy) -> DetectionBatch {
    batch.into_iter().filter(|d| policy.keeps(d)).collect()
}
