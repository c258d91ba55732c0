//! # Header Sync Configuration
//!
//! Configuration for the header-sync service.

use serde::{Deserialize, Serialize};
use shared_types::{hex_address, Address};

use crate::domain::DEFAULT_MAX_HEADERS_PER_BATCH;

/// Default address of the header-sync contract.
pub const DEFAULT_HEADER_SYNC_CONTRACT: Address = {
    let mut addr = [0u8; 20];
    addr[19] = 0x0D;
    addr
};

/// Header sync configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSyncConfig {
    /// Namespace of every header-sync storage key.
    #[serde(with = "hex_address")]
    pub contract_address: Address,

    /// Maximum headers accepted by one `sync_headers` call.
    pub max_headers_per_batch: usize,

    /// Check batch signatures on the rayon pool.
    pub verify_in_parallel: bool,
}

impl Default for HeaderSyncConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_HEADER_SYNC_CONTRACT,
            max_headers_per_batch: DEFAULT_MAX_HEADERS_PER_BATCH,
            verify_in_parallel: true,
        }
    }
}

impl HeaderSyncConfig {
    /// Create a config for testing (small batches, sequential checks).
    pub fn for_testing() -> Self {
        Self {
            contract_address: DEFAULT_HEADER_SYNC_CONTRACT,
            max_headers_per_batch: 16,
            verify_in_parallel: false,
        }
    }
}
