//! Detector client error types.

use thiserror::Error;

pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Detector returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DetectorError::Network(e) if e.is_timeout())
    }

    /// Check if the failure is transient on the detector's side.
    pub fn is_retryable(&self) -> bool {
        match self {
            DetectorError::Network(_) => true,
            DetectorError::Status { status, .. } => *status >= 500,
            DetectorError::Json(_) => false,
        }
    }
}
