//! In-Memory Peer Pool Adapter
//!
//! Implements the `PeerPool` port from a fixed membership table.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{Address, KvStore, StorageError};
use tracing::debug;

use crate::ports::PeerPool;

/// Peer pool held in memory, for local nodes and tests.
#[derive(Default)]
pub struct InMemoryPeerPool {
    /// Peer public key (lowercase hex) -> owner.
    owners: RwLock<HashMap<String, Address>>,
}

impl InMemoryPeerPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a peer.
    pub fn insert(&self, peer_pubkey: &str, owner: Address) {
        debug!("[qc-14] peer pool: {} owned by {}", peer_pubkey, hex::encode(owner));
        self.owners.write().insert(peer_pubkey.to_lowercase(), owner);
    }

    /// Remove a peer.
    pub fn remove(&self, peer_pubkey: &str) {
        self.owners.write().remove(&peer_pubkey.to_lowercase());
    }
}

impl PeerPool for InMemoryPeerPool {
    fn peer_owner(
        &self,
        _storage: &dyn KvStore,
        peer_pubkey: &str,
    ) -> Result<Option<Address>, StorageError> {
        Ok(self.owners.read().get(&peer_pubkey.to_lowercase()).copied())
    }
}
