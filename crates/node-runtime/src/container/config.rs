//! # Runtime Configuration
//!
//! Unified configuration for the native subsystems and logging.
//!
//! ## Requirements
//!
//! - Contract addresses MUST be non-zero and pairwise distinct
//! - Registry and relay MUST move fees through the same token contract

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ZERO_ADDRESS};
use thiserror::Error;

use qc_13_header_sync::HeaderSyncConfig;
use qc_14_chain_registry::RegistryConfig;
use qc_15_cross_chain::CrossChainConfig;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Buffer observer notifications during invocations.
    pub enable_event_log: bool,
    /// Header sync (Subsystem 13).
    pub header_sync: HeaderSyncConfig,
    /// Chain registry (Subsystem 14).
    pub registry: RegistryConfig,
    /// Cross-chain relay (Subsystem 15).
    pub cross_chain: CrossChainConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enable_event_log: true,
            header_sync: HeaderSyncConfig::default(),
            registry: RegistryConfig::default(),
            cross_chain: CrossChainConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            enable_event_log: true,
            header_sync: HeaderSyncConfig::for_testing(),
            registry: RegistryConfig::for_testing(),
            cross_chain: CrossChainConfig::for_testing(),
            logging: LoggingConfig {
                level: "debug".into(),
                ..LoggingConfig::default()
            },
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("failed to parse runtime configuration")?;
        config.validate().context("invalid runtime configuration")?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Check contract addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.token_contract != self.cross_chain.token_contract {
            return Err(ConfigError::TokenContractMismatch);
        }

        let contracts = [
            ("header_sync", self.header_sync.contract_address),
            ("registry", self.registry.contract_address),
            ("cross_chain", self.cross_chain.contract_address),
            ("token", self.registry.token_contract),
        ];
        for (i, &(name, addr)) in contracts.iter().enumerate() {
            if addr == ZERO_ADDRESS {
                return Err(ConfigError::ZeroAddress(name));
            }
            if let Some(&(first, _)) = contracts[..i].iter().find(|(_, a)| *a == addr) {
                return Err(ConfigError::DuplicateAddress {
                    first,
                    second: name,
                    address: addr,
                });
            }
        }
        Ok(())
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `qc_13_header_sync=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Include the event target.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            with_target: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A contract address is the zero address.
    #[error("{0} contract address is zero")]
    ZeroAddress(&'static str),

    /// Two components share one contract address.
    #[error("{first} and {second} share contract address {}", hex::encode(.address))]
    DuplicateAddress {
        /// Component configured first.
        first: &'static str,
        /// Component configured second.
        second: &'static str,
        /// Shared address.
        address: Address,
    },

    /// Registry and relay name different token contracts.
    #[error("registry and cross-chain token contracts differ")]
    TokenContractMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RuntimeConfig::default().validate().is_ok());
        assert!(RuntimeConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RuntimeConfig::from_json_str(
            r#"{"enable_event_log": false, "logging": {"level": "warn"}}"#,
        )
        .unwrap();
        assert!(!config.enable_event_log);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.with_target);
        assert_eq!(config.cross_chain, CrossChainConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = RuntimeConfig::for_testing();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RuntimeConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_zero_address_rejected() {
        let mut config = RuntimeConfig::default();
        config.header_sync.contract_address = ZERO_ADDRESS;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroAddress("header_sync"))
        );
    }

    #[test]
    fn test_shared_address_rejected() {
        let mut config = RuntimeConfig::default();
        config.cross_chain.contract_address = config.registry.contract_address;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateAddress {
                first: "registry",
                second: "cross_chain",
                ..
            }
        ));
        assert!(err.to_string().contains("share contract address"));
    }

    #[test]
    fn test_token_mismatch_rejected() {
        let mut config = RuntimeConfig::default();
        config.cross_chain.token_contract = [0x77; 20];
        assert_eq!(config.validate(), Err(ConfigError::TokenContractMismatch));
    }

    #[test]
    fn test_invalid_json_reports_context() {
        let err = RuntimeConfig::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse runtime configuration"));
    }
}
