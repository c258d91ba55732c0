//! # Subsystem Container
//!
//! Runtime configuration and the services built from it.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, LoggingConfig, RuntimeConfig};
pub use subsystems::SubsystemContainer;
