//! Detection orchestrator.
//!
//! Decides per image whether the specialist classifier must run, serializes
//! specialist invocations through a single-permit gate, filters the
//! specialist's output and fuses both backends into one result.

pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod fuse;
pub mod gate;
pub mod metrics;
pub mod orchestrator;
pub mod trigger;

pub use backend::{PrimaryDetector, SpecialistClassifier};
pub use config::OrchestratorConfig;
pub use error::{CoreError, CoreResult, SpecialistError, SpecialistResult};
pub use filter::{filter_predictions, FilterPolicy};
pub use fuse::fuse;
pub use gate::ConcurrencyGate;
pub use orchestrator::{DetectionOrchestrator, TriggerReason};
pub use trigger::{should_invoke_specialist, TriggerSet};
