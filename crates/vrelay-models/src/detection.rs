//! Detection types shared by both backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Label given to the synthetic summary detection appended after fusion.
pub const GENERIC_ANIMAL_LABEL: &str = "animal";

/// Ordered detections produced by one backend for one image.
///
/// Order reflects backend emission order and is preserved through fusion.
pub type DetectionBatch = Vec<Detection>;

/// Pixel-space bounding box of a detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Box covering a whole image of the given size.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self::new(0, 0, i64::from(width), i64::from(height))
    }

    /// All-zero box, meaning the backend supplied no location.
    pub fn is_degenerate(&self) -> bool {
        self.x_min == 0 && self.y_min == 0 && self.x_max == 0 && self.y_max == 0
    }

    /// Check corner ordering. Degenerate boxes are valid.
    pub fn is_valid(&self) -> bool {
        self.is_degenerate() || (self.x_min <= self.x_max && self.y_min <= self.y_max)
    }
}

/// One recognized object or class instance.
///
/// Serialized in the CodeProject.AI prediction shape. Fields a backend sends
/// beyond the ones modelled here are kept in `extra` and written back out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Backend-assigned label, case as produced
    #[serde(default)]
    pub label: String,
    /// Confidence in [0.0, 1.0]
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x_min: i64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y_min: i64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x_max: i64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y_max: i64,
    /// Optional backend-specific fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Accept any JSON number (or null) as a pixel coordinate, rounding floats.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i64)
        .unwrap_or(0))
}

impl Detection {
    /// Create a detection without a bounding box.
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            extra: BTreeMap::new(),
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.x_min = bbox.x_min;
        self.y_min = bbox.y_min;
        self.x_max = bbox.x_max;
        self.y_max = bbox.y_max;
        self
    }

    /// Attach an extra backend field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Copy of this detection carrying a different label.
    pub fn relabeled(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Bounding box of this detection.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x_min, self.y_min, self.x_max, self.y_max)
    }
}
