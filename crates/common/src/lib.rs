//! Slidecast Common Utilities
//!
//! Shared infrastructure for all Slidecast crates:
//! - Error types and result aliases
//! - Run clock and bounded wait helpers for external tools
//! - Tracing/logging initialization
//! - Configuration loading
//! - External tool discovery

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod tools;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use tools::command_exists;
