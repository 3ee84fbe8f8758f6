//! Shared data models for Vision Relay.
//!
//! This crate provides Serde-serializable types for:
//! - Detections produced by the primary detector and the specialist
//! - Primary detector responses (CodeProject.AI compatible)
//! - The fused per-request result returned to callers

pub mod detection;
pub mod result;

// Re-export common types
pub use detection::{BoundingBox, Detection, DetectionBatch, GENERIC_ANIMAL_LABEL};
pub use result::{PrimaryResponse, RequestResult, PROCESSED_MESSAGE};
