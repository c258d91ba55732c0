//! # Relay Configuration

use serde::{Deserialize, Serialize};
use shared_types::{hex_address, Address};

/// Default address of the relay contract.
pub const DEFAULT_CROSS_CHAIN_CONTRACT: Address = {
    let mut addr = [0u8; 20];
    addr[19] = 0x0F;
    addr
};

/// Default bound on proof nodes per relayed request.
pub const DEFAULT_MAX_PROOF_NODES: usize = 64;

/// Cross-chain relay configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainConfig {
    /// Namespace of relay storage keys and of proven request keys.
    #[serde(with = "hex_address")]
    pub contract_address: Address,

    /// Token contract moving fees.
    #[serde(with = "hex_address")]
    pub token_contract: Address,

    /// Maximum proof nodes accepted by `processCrossChainTx`.
    pub max_proof_nodes: usize,
}

impl Default for CrossChainConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CROSS_CHAIN_CONTRACT,
            token_contract: qc_14_chain_registry::DEFAULT_TOKEN_CONTRACT,
            max_proof_nodes: DEFAULT_MAX_PROOF_NODES,
        }
    }
}

impl CrossChainConfig {
    /// Create a config for testing (short proofs only).
    pub fn for_testing() -> Self {
        Self {
            max_proof_nodes: 16,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrossChainConfig::default();
        assert_eq!(config.max_proof_nodes, 64);
        assert_eq!(config.token_contract, qc_14_chain_registry::DEFAULT_TOKEN_CONTRACT);
    }

    #[test]
    fn test_testing_config() {
        assert_eq!(CrossChainConfig::for_testing().max_proof_nodes, 16);
    }
}
