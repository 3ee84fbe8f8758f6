//! Specialist client error types.

use thiserror::Error;
use vrelay_core::SpecialistError;

pub type ClassifierResult<T> = Result<T, ClassifierError>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Image could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No async runtime available: {0}")]
    Runtime(String),
}

impl ClassifierError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClassifierError::Network(e) if e.is_timeout())
    }
}

impl From<ClassifierError> for SpecialistError {
    fn from(err: ClassifierError) -> Self {
        SpecialistError::backend(err)
    }
}
