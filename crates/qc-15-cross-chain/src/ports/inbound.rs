//! # Inbound Ports
//!
//! API trait defining what the relay engine can do.

use shared_types::{ChainId, KvStore, NativeContext};

use crate::domain::{
    CreateCrossChainTxParam, ProcessCrossChainTxParam, RelayError, RelayedRequest, RemainedIds,
};

/// Cross-chain relay API - inbound port.
pub trait CrossChainApi: Send + Sync {
    /// Charge the fee and record a request; returns its sequence id.
    fn create(
        &self,
        ctx: &mut NativeContext<'_>,
        param: &CreateCrossChainTxParam,
    ) -> Result<u64, RelayError>;

    /// Verify a relayed request against a trusted header and execute it once.
    fn process(
        &self,
        ctx: &mut NativeContext<'_>,
        param: &ProcessCrossChainTxParam,
    ) -> Result<RelayedRequest, RelayError>;

    /// Highest sequence id relayed for `chain_id`.
    fn current_id(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<u64, RelayError>;

    /// Sequence ids of `chain_id` skipped over and still owed.
    fn remained_ids(&self, storage: &dyn KvStore, chain_id: ChainId)
        -> Result<RemainedIds, RelayError>;
}
