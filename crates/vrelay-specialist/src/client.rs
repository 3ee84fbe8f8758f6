//! SpeciesNet sidecar client.

use std::io::Cursor;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tokio::runtime::Handle;
use tracing::debug;
use vrelay_core::{SpecialistClassifier, SpecialistResult};
use vrelay_models::{BoundingBox, DetectionBatch};

use crate::error::{ClassifierError, ClassifierResult};
use crate::types::ClassifyResponse;

/// Classification endpoint path on the sidecar.
pub const CLASSIFY_PATH: &str = "/classify";

/// Configuration for the SpeciesNet client.
#[derive(Debug, Clone)]
pub struct SpeciesNetConfig {
    /// Base URL of the classifier sidecar
    pub base_url: String,
    /// Geographic hint passed with every image
    pub region: String,
    /// Request timeout. Model inference on CPU is slow.
    pub timeout: Duration,
}

impl Default for SpeciesNetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            region: "AUS".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl SpeciesNetConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SPECIESNET_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            region: std::env::var("SPECIESNET_REGION").unwrap_or_else(|_| "AUS".to_string()),
            timeout: Duration::from_secs(
                std::env::var("SPECIESNET_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }
}

/// Blocking client for the species classifier.
///
/// HTTP runs on the async runtime captured at construction; `classify`
/// blocks the calling worker thread on it.
pub struct SpeciesNetClient {
    http: Client,
    config: SpeciesNetConfig,
    classify_url: String,
    runtime: Handle,
}

impl SpeciesNetClient {
    /// Create a client bound to the current tokio runtime.
    pub fn new(config: SpeciesNetConfig) -> ClassifierResult<Self> {
        let runtime = Handle::try_current().map_err(|e| ClassifierError::Runtime(e.to_string()))?;
        Self::with_runtime(config, runtime)
    }

    /// Create a client bound to an explicit runtime handle.
    pub fn with_runtime(config: SpeciesNetConfig, runtime: Handle) -> ClassifierResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let classify_url = format!("{}{}", config.base_url.trim_end_matches('/'), CLASSIFY_PATH);

        Ok(Self {
            http,
            config,
            classify_url,
            runtime,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClassifierResult<Self> {
        Self::new(SpeciesNetConfig::from_env())
    }

    pub fn config(&self) -> &SpeciesNetConfig {
        &self.config
    }

    /// Classify an image and map the result to whole-frame detections.
    pub async fn classify_async(&self, image: &[u8]) -> ClassifierResult<DetectionBatch> {
        let frame = image_frame(image)?;
        debug!(
            width = frame.x_max,
            height = frame.y_max,
            region = %self.config.region,
            "Sending image to classifier"
        );

        let part = Part::bytes(image.to_vec())
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .part("image", part)
            .text("region", self.config.region.clone());

        let response = self.http.post(&self.classify_url).multipart(form).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let body = response.bytes().await?;
        let parsed: ClassifyResponse = serde_json::from_slice(&body)?;

        Ok(parsed
            .predictions
            .into_iter()
            .map(|item| item.into_detection(frame))
            .collect())
    }
}

impl SpecialistClassifier for SpeciesNetClient {
    fn classify(&self, image: &[u8]) -> SpecialistResult<DetectionBatch> {
        Ok(self.runtime.block_on(self.classify_async(image))?)
    }

    fn name(&self) -> &'static str {
        "speciesnet"
    }
}

/// Whole-image box for an encoded image, read from its header.
pub fn image_frame(image: &[u8]) -> ClassifierResult<BoundingBox> {
    let (width, height) = image::ImageReader::new(Cursor::new(image))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(BoundingBox::full_frame(width, height))
}
