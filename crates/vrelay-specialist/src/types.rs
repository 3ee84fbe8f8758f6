//! Wire types of the classifier sidecar.

use serde::Deserialize;
use serde_json::Value;
use vrelay_models::{BoundingBox, Detection};

/// Label used when the classifier names neither a label nor a common name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Body of a `/classify` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub predictions: Vec<Classification>,
}

/// One whole-image classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Classification {
    /// Raw class string, e.g. `"<uuid>;mammalia;...;possum"` or the blank class
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Classification {
    /// Convert into a detection spanning the whole image.
    pub fn into_detection(self, frame: BoundingBox) -> Detection {
        let label = self
            .label
            .clone()
            .filter(|l| !l.is_empty())
            .or_else(|| self.common_name.clone().filter(|c| !c.is_empty()))
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        let mut detection = Detection::new(label, self.score.unwrap_or(0.0)).with_bbox(frame);
        if let Some(name) = self.scientific_name {
            detection = detection.with_extra("scientific_name", Value::String(name));
        }
        if let Some(name) = self.common_name {
            detection = detection.with_extra("common_name", Value::String(name));
        }
        detection
    }
}
