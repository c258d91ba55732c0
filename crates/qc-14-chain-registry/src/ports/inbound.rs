//! # Inbound Ports
//!
//! Registry API consumed by the cross-chain relay engine.

use shared_types::{Address, ChainId, KvStore, NativeContext};

use crate::domain::{RegistryError, SideChain};

/// Chain registry API.
pub trait ChainRegistryApi: Send + Sync {
    /// Registered side chain `chain_id`.
    fn side_chain(&self, storage: &dyn KvStore, chain_id: ChainId)
        -> Result<SideChain, RegistryError>;

    /// Overwrite the record of an existing side chain.
    fn put_side_chain(
        &self,
        storage: &mut dyn KvStore,
        side_chain: &SideChain,
    ) -> Result<(), RegistryError>;

    /// Account holding deposits and fee pools.
    fn escrow_address(&self) -> Address;

    /// Transfer `amount` out of the escrow account to `to`.
    fn pay_out(&self, ctx: &mut NativeContext<'_>, to: Address, amount: u64) -> Result<(), RegistryError>;
}
