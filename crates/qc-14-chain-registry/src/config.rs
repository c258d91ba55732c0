//! # Registry Configuration

use serde::{Deserialize, Serialize};
use shared_types::{hex_address, Address, ChainId};

/// Default address of the registry contract.
pub const DEFAULT_REGISTRY_CONTRACT: Address = {
    let mut addr = [0u8; 20];
    addr[19] = 0x0E;
    addr
};

/// Default address of the token contract used for deposits and fees.
pub const DEFAULT_TOKEN_CONTRACT: Address = {
    let mut addr = [0u8; 20];
    addr[19] = 0x02;
    addr
};

/// Chain registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Namespace of registry storage keys; also the escrow account.
    #[serde(with = "hex_address")]
    pub contract_address: Address,

    /// Token contract moving deposits and fees.
    #[serde(with = "hex_address")]
    pub token_contract: Address,

    /// Id of the main chain, never accepted as a side-chain id.
    pub main_chain_id: ChainId,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_REGISTRY_CONTRACT,
            token_contract: DEFAULT_TOKEN_CONTRACT,
            main_chain_id: 0,
        }
    }
}

impl RegistryConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self::default()
    }
}
