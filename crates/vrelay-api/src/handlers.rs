//! Request handlers.

pub mod detection;
pub mod health;

pub use detection::*;
pub use health::*;
