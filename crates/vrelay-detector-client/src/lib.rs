//! Client for the primary object detector.
//!
//! Talks to a CodeProject.AI-compatible detection server (Blue Onyx) over
//! HTTP. The client never fails towards the orchestrator: any transport,
//! status or decoding problem is logged and reported as an unsuccessful,
//! empty response.

pub mod client;
pub mod error;

pub use client::{DetectorClient, DetectorClientConfig};
pub use error::{DetectorError, DetectorResult};
