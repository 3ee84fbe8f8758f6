//! Core error types.

use std::time::Duration;

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

pub type SpecialistResult<T> = Result<T, SpecialistError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Concurrency gate closed")]
    GateClosed,

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of one specialist invocation.
///
/// The orchestrator never surfaces these to callers; they are logged and the
/// request continues with an empty specialist batch.
#[derive(Debug, Error)]
pub enum SpecialistError {
    #[error("Specialist backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Specialist budget of {0:?} exceeded")]
    BudgetExceeded(Duration),

    #[error("Specialist invocation failed: {0}")]
    Invocation(#[from] CoreError),
}

impl SpecialistError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }

    /// Stable label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SpecialistError::Backend(_) => "backend",
            SpecialistError::BudgetExceeded(_) => "budget",
            SpecialistError::Invocation(_) => "invocation",
        }
    }
}
