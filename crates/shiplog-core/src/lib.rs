//! Shiplog Core - configuration and error handling
//!
//! This crate provides the configuration system and error taxonomy shared
//! by the shiplog changelog generator.

pub mod config;
pub mod error;

pub use config::{load_config_or_default, Config};
pub use error::{ChangelogError, ClassifyError, ConfigError, GitError, Result, ShiplogError};
