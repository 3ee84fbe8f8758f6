//! Request and backend response types.

use serde::{Deserialize, Serialize};

use crate::detection::DetectionBatch;

/// Response of the primary detector.
///
/// `success = false` with no predictions is what the detector client returns
/// when the backend could not be reached or answered garbage.
///
/// A detector that omits `success` is taken to have succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub predictions: DetectionBatch,
}

fn default_success() -> bool {
    true
}

impl PrimaryResponse {
    /// Successful response carrying the given predictions.
    pub fn ok(predictions: DetectionBatch) -> Self {
        Self {
            success: true,
            predictions,
        }
    }

    /// Structurally valid failure response with no predictions.
    pub fn failed() -> Self {
        Self {
            success: false,
            predictions: Vec::new(),
        }
    }
}

/// Status text carried by every fused result.
pub const PROCESSED_MESSAGE: &str = "Processed by Vision Relay";

/// Fused result returned for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResult {
    pub success: bool,
    pub predictions: DetectionBatch,
    #[serde(default)]
    pub message: String,
    pub count: usize,
}

impl RequestResult {
    /// Build a successful result; `count` always mirrors the prediction length.
    pub fn success(predictions: DetectionBatch) -> Self {
        let count = predictions.len();
        Self {
            success: true,
            predictions,
            message: PROCESSED_MESSAGE.to_string(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Detection;

    #[test]
    fn test_request_result_count_matches_predictions() {
        let result = RequestResult::success(vec![
            Detection::new("cat", 0.8),
            Detection::new("animal", 0.8),
        ]);
        assert!(result.success);
        assert_eq!(result.count, 2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["message"], PROCESSED_MESSAGE);
        assert_eq!(json["predictions"][0]["label"], "cat");
    }

    #[test]
    fn test_primary_response_tolerates_extra_keys() {
        let json = r#"{"success":true,"predictions":[{"label":"dog","confidence":0.7}],"inferenceMs":12,"moduleId":"ObjectDetectionYOLOv8"}"#;
        let resp: PrimaryResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.predictions.len(), 1);
    }

    #[test]
    fn test_missing_success_key_means_success() {
        let resp: PrimaryResponse = serde_json::from_str(r#"{"predictions":[]}"#).unwrap();
        assert!(resp.success);

        let resp: PrimaryResponse =
            serde_json::from_str(r#"{"success":false,"predictions":[]}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_primary_response_failed_is_empty() {
        let resp = PrimaryResponse::failed();
        assert!(!resp.success);
        assert!(resp.predictions.is_empty());
    }
}
