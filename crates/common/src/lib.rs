//! Holdwatch Common Utilities
//!
//! Shared infrastructure for all Holdwatch crates:
//! - Error types and result aliases
//! - Video and wall-clock time sources
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
