//! # Inbound Ports
//!
//! API offered to the chain registry (genesis seeding and removal), the relay engine
//! (trusted header lookup) and the runtime dispatch table.

use qc_02_header_codec::Header;
use shared_types::{Address, ChainId, Hash, KvStore, NativeContext};

use crate::domain::{ConsensusPeers, HeaderSyncError, SyncSummary};

/// Header sync API.
pub trait HeaderSyncApi: Send + Sync {
    /// Address namespacing header-sync storage.
    fn contract_address(&self) -> Address;

    /// Trust `raw` as the genesis header of its chain and seed its validator
    /// set at the genesis height. Headers below that height have no trusted
    /// set. Only the chain registry calls this, when it approves a chain.
    fn init_genesis_header(
        &self,
        ctx: &mut NativeContext<'_>,
        raw: &[u8],
    ) -> Result<Header, HeaderSyncError>;

    /// Forget every header and validator set of `chain_id`.
    fn remove_chain(&self, ctx: &mut NativeContext<'_>, chain_id: ChainId) -> Result<(), HeaderSyncError>;

    /// Verify and commit a batch of serialized headers.
    fn sync_headers(
        &self,
        ctx: &mut NativeContext<'_>,
        headers: &[Vec<u8>],
    ) -> Result<SyncSummary, HeaderSyncError>;

    /// Committed header at `height`.
    fn get_header_by_height(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        height: u32,
    ) -> Result<Header, HeaderSyncError>;

    /// Committed header with `hash`.
    fn get_header_by_hash(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        hash: &Hash,
    ) -> Result<Header, HeaderSyncError>;

    /// Highest committed height, if any header was committed.
    fn current_height(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<Option<u32>, HeaderSyncError>;

    /// Validator set trusted at `height`, with the key height it came from.
    fn get_consensus_peers(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        height: u32,
    ) -> Result<(u32, ConsensusPeers), HeaderSyncError>;
}
