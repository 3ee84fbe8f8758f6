//! Primary detector HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};
use vrelay_core::PrimaryDetector;
use vrelay_models::PrimaryResponse;

use crate::error::{DetectorError, DetectorResult};

/// Detection endpoint path on CodeProject.AI-compatible servers.
pub const DETECTION_PATH: &str = "/v1/vision/detection";

/// Configuration for the detector client.
#[derive(Debug, Clone)]
pub struct DetectorClientConfig {
    /// Base URL of the detection server
    pub base_url: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Retries after a transient failure
    pub max_retries: u32,
}

impl Default for DetectorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 0,
        }
    }
}

impl DetectorClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("BLUE_ONYX_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("BLUE_ONYX_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            max_retries: std::env::var("BLUE_ONYX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        }
    }
}

/// Client for the primary object detector.
pub struct DetectorClient {
    http: Client,
    config: DetectorClientConfig,
    detect_url: String,
}

impl DetectorClient {
    /// Create a new detector client.
    pub fn new(config: DetectorClientConfig) -> DetectorResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(DetectorError::Network)?;
        let detect_url = format!("{}{}", config.base_url.trim_end_matches('/'), DETECTION_PATH);

        Ok(Self {
            http,
            config,
            detect_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> DetectorResult<Self> {
        Self::new(DetectorClientConfig::from_env())
    }

    pub fn config(&self) -> &DetectorClientConfig {
        &self.config
    }

    /// Check whether the detection server answers at all.
    pub async fn health_check(&self) -> DetectorResult<bool> {
        match self.http.get(&self.config.base_url).send().await {
            Ok(response) if response.status().is_server_error() => {
                warn!("Detector health check failed: {}", response.status());
                Ok(false)
            }
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("Detector health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Send an image for detection, surfacing any failure.
    pub async fn try_detect(&self, image: &[u8]) -> DetectorResult<PrimaryResponse> {
        debug!("Sending {} bytes to {}", image.len(), self.detect_url);

        let response = self
            .with_retry(|| async {
                let part = Part::bytes(image.to_vec())
                    .file_name("image.jpg")
                    .mime_str("image/jpeg")?;
                let form = Form::new().part("image", part);

                let response = self.http.post(&self.detect_url).multipart(form).send().await?;
                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    return Err(DetectorError::Status { status, body });
                }
                Ok::<_, DetectorError>(response)
            })
            .await?;

        let body = response.bytes().await?;
        let parsed: PrimaryResponse = serde_json::from_slice(&body)?;
        debug!(
            success = parsed.success,
            predictions = parsed.predictions.len(),
            "Detector responded"
        );
        Ok(parsed)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> DetectorResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = DetectorResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(200 * 2u64.pow(attempt));
                    warn!(
                        "Detector request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl PrimaryDetector for DetectorClient {
    async fn detect(&self, image: &[u8]) -> PrimaryResponse {
        match self.try_detect(image).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    timeout = e.is_timeout(),
                    "Error calling primary detector: {}", e
                );
                PrimaryResponse::failed()
            }
        }
    }

    fn name(&self) -> &'static str {
        "blue-onyx"
    }
}
