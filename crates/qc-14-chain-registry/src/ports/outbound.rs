//! # Outbound Ports
//!
//! Governance state the registry depends on.

use shared_types::{Address, KvStore, StorageError};

/// Governance peer pool - outbound port.
///
/// Side-chain nodes must be members of the main chain's peer pool.
pub trait PeerPool: Send + Sync {
    /// Owner of `peer_pubkey`, if the peer is in the pool.
    fn peer_owner(
        &self,
        storage: &dyn KvStore,
        peer_pubkey: &str,
    ) -> Result<Option<Address>, StorageError>;
}
