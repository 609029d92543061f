//! Configuration system for retrack.
//!
//! This crate provides configuration loading, saving, and default values
//! for the text re-styling run. It includes:
//!
//! - The `Config` struct and its serde defaults
//! - YAML persistence under the XDG config directory
//! - Typed `ConfigError` variants for I/O, parse and validation failures

pub mod config;
pub mod defaults;
pub mod error;
mod persistence;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{LogLevel, PrewarmScope};
