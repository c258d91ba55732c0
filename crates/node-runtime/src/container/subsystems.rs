//! # Subsystem Container
//!
//! Holds the native subsystem services, wired in dependency order:
//!
//! ```text
//! Level 0: Header Sync (qc-13)
//! Level 1: Chain Registry (qc-14)  -> seeds header sync on approval
//! Level 2: Cross-Chain Relay (qc-15) -> trusts qc-13 headers, qc-14 pools
//! ```
//!
//! Services are stateless apart from configuration; all state lives in the
//! storage handed to each invocation, so the container is shared via `Arc`.

use std::sync::Arc;

use tracing::info;

use qc_13_header_sync::{HeaderSyncApi, HeaderSyncService};
use qc_14_chain_registry::{ChainRegistryApi, ChainRegistryService, PeerPool};
use qc_15_cross_chain::CrossChainService;

use crate::container::config::RuntimeConfig;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    /// Header Sync (Subsystem 13).
    pub header_sync: Arc<HeaderSyncService>,

    /// Chain Registry (Subsystem 14).
    pub registry: Arc<ChainRegistryService>,

    /// Cross-Chain Relay (Subsystem 15).
    pub cross_chain: Arc<CrossChainService>,

    /// Configuration the services were built from.
    pub config: RuntimeConfig,
}

impl SubsystemContainer {
    /// Build all services. `peer_pool` answers governance peer ownership
    /// for side-chain node registration.
    pub fn new(config: RuntimeConfig, peer_pool: Arc<dyn PeerPool>) -> Self {
        let header_sync = Arc::new(HeaderSyncService::new(config.header_sync.clone()));
        info!("[runtime] header sync ready");

        let registry = Arc::new(ChainRegistryService::new(
            config.registry.clone(),
            header_sync.clone() as Arc<dyn HeaderSyncApi>,
            peer_pool,
        ));
        info!("[runtime] chain registry ready");

        let cross_chain = Arc::new(CrossChainService::new(
            config.cross_chain.clone(),
            header_sync.clone() as Arc<dyn HeaderSyncApi>,
            registry.clone() as Arc<dyn ChainRegistryApi>,
        ));
        info!("[runtime] cross-chain relay ready");

        Self {
            header_sync,
            registry,
            cross_chain,
            config,
        }
    }
}
