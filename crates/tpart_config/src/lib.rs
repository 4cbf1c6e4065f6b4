//! Parsing and validation of `tpart.toml` refinement configuration files.
//!
//! This crate reads the partitioner configuration and produces a strongly-typed
//! [`RefineConfig`] covering the block count, cost weight factors, timing
//! factors and the per-pass move budget.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
