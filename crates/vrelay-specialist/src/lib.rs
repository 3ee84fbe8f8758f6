//! SpeciesNet specialist classifier.
//!
//! Whole-image species classification served by a sidecar process. The
//! client is driven synchronously from the orchestrator's blocking worker
//! and reports every failure as an error so the orchestrator can log it and
//! drop the specialist's contribution.

pub mod client;
pub mod error;
pub mod types;

pub use client::{SpeciesNetClient, SpeciesNetConfig};
pub use error::{ClassifierError, ClassifierResult};
pub use types::{Classification, ClassifyResponse};
