//! # Cross-Chain Relay Service
//!
//! `createCrossChainTx` records a request for a side chain and charges its
//! fee into the chain's pool. `processCrossChainTx` relays a request recorded
//! on a side chain: the request must be proven under the cross-states root
//! of a trusted header, is executed at most once, and pays the relayer from
//! the pool. The destination runs with the relay contract's authority only
//! and may not be one of the native contracts.

use std::sync::Arc;

use qc_04_trie_proof::verify_proof;
use qc_13_header_sync::{HeaderSyncApi, HeaderSyncError};
use qc_14_chain_registry::{ChainRegistryApi, RegistryError};
use serde_json::json;
use shared_types::{
    Address, ChainId, Decode, Encode, KvStore, NativeContext, Transfers, TRANSFER_METHOD,
};

use crate::adapters::{request_key, CrossChainStore};
use crate::algorithms::consume_sequence;
use crate::config::CrossChainConfig;
use crate::domain::{
    CreateCrossChainTxParam, ProcessCrossChainTxParam, RelayError, RelayedRequest, RemainedIds,
};
use crate::ports::CrossChainApi;

/// Event emitted by `createCrossChainTx`.
pub const CREATE_CROSS_CHAIN_TX_EVENT: &str = "createCrossChainTx";
/// Event emitted by `processCrossChainTx`.
pub const PROCESS_CROSS_CHAIN_TX_EVENT: &str = "processCrossChainTx";

/// Cross-Chain Relay Service.
pub struct CrossChainService {
    config: CrossChainConfig,
    store: CrossChainStore,
    header_sync: Arc<dyn HeaderSyncApi>,
    registry: Arc<dyn ChainRegistryApi>,
}

impl CrossChainService {
    /// Create a relay trusting headers from `header_sync` and keeping fee
    /// pools in `registry`.
    pub fn new(
        config: CrossChainConfig,
        header_sync: Arc<dyn HeaderSyncApi>,
        registry: Arc<dyn ChainRegistryApi>,
    ) -> Self {
        let store = CrossChainStore::new(config.contract_address);
        Self {
            config,
            store,
            header_sync,
            registry,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &CrossChainConfig {
        &self.config
    }

    /// Storage layout used by this service.
    pub fn store(&self) -> &CrossChainStore {
        &self.store
    }

    /// `createCrossChainTx` entry point.
    pub fn create_cross_chain_tx(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<u64, RelayError> {
        let param = CreateCrossChainTxParam::from_bytes(input)?;
        self.create(ctx, &param)
    }

    /// `processCrossChainTx` entry point.
    pub fn process_cross_chain_tx(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<RelayedRequest, RelayError> {
        let param = ProcessCrossChainTxParam::from_bytes(input)?;
        self.process(ctx, &param)
    }

    /// Payload of request `seq` recorded here for `chain_id`.
    pub fn request(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        seq: u64,
    ) -> Result<Option<CreateCrossChainTxParam>, RelayError> {
        match self.store.request(storage, chain_id, seq)? {
            Some(raw) => Ok(Some(CreateCrossChainTxParam::from_bytes(&raw)?)),
            None => Ok(None),
        }
    }

    fn transfer(
        &self,
        ctx: &mut NativeContext<'_>,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), RelayError> {
        if amount == 0 {
            return Ok(());
        }
        let args = Transfers::single(from, to, amount).to_bytes();
        ctx.invoke(&self.config.contract_address, &self.config.token_contract, TRANSFER_METHOD, &args)?;
        Ok(())
    }

    /// Native contracts a relayed request may not call.
    fn is_protected(&self, contract: &Address) -> bool {
        [
            self.config.contract_address,
            self.config.token_contract,
            self.registry.escrow_address(),
            self.header_sync.contract_address(),
        ]
        .contains(contract)
    }

    /// Advance the sequence ledger of `chain_id` past `seq`.
    fn record_delivery(
        &self,
        ctx: &mut NativeContext<'_>,
        chain_id: ChainId,
        seq: u64,
    ) -> Result<(), RelayError> {
        let current = self.store.current_id(&*ctx, chain_id)?;
        let mut remained = self.store.remained_ids(&*ctx, chain_id)?;
        let next = consume_sequence(chain_id, current, &mut remained, seq)?;
        if next != current {
            self.store.put_current_id(ctx, chain_id, next)?;
        }
        self.store.put_remained_ids(ctx, chain_id, &remained)?;
        Ok(())
    }
}

impl CrossChainApi for CrossChainService {
    fn create(
        &self,
        ctx: &mut NativeContext<'_>,
        param: &CreateCrossChainTxParam,
    ) -> Result<u64, RelayError> {
        if !ctx.check_witness(&param.from) {
            return Err(RelayError::Unauthorized(hex::encode(param.from)));
        }
        let chain_id = param.to_chain_id;
        let mut side_chain = self.registry.side_chain(&*ctx, chain_id)?;
        if !side_chain.accepts_cross_chain() {
            return Err(RegistryError::NotRelaying {
                chain_id,
                status: side_chain.status,
            }
            .into());
        }

        let charge = side_chain.charge_fee(param.fee)?;
        self.registry.put_side_chain(ctx, &side_chain)?;
        self.transfer(ctx, param.from, self.registry.escrow_address(), charge)?;

        let seq = self
            .store
            .request_id(&*ctx, chain_id)?
            .checked_add(1)
            .ok_or(RelayError::SequenceOverflow(chain_id))?;
        self.store.put_request(ctx, chain_id, seq, param.to_bytes())?;

        let height = ctx.height();
        ctx.notify(
            self.config.contract_address,
            CREATE_CROSS_CHAIN_TX_EVENT,
            json!({
                "toChainId": chain_id,
                "requestId": seq,
                "fee": param.fee,
                "feeCharge": charge,
                "height": height,
            }),
        );
        tracing::info!(
            "[qc-15] request {} for chain {} created, pool {}",
            seq,
            chain_id,
            side_chain.fee_pool
        );
        Ok(seq)
    }

    fn process(
        &self,
        ctx: &mut NativeContext<'_>,
        param: &ProcessCrossChainTxParam,
    ) -> Result<RelayedRequest, RelayError> {
        if param.proof.len() > self.config.max_proof_nodes {
            return Err(RelayError::ProofTooLarge {
                nodes: param.proof.len(),
                max: self.config.max_proof_nodes,
            });
        }
        if !ctx.check_witness(&param.relayer) {
            return Err(RelayError::Unauthorized(hex::encode(param.relayer)));
        }
        let (chain_id, seq, height) = (param.chain_id, param.seq, param.height);

        self.record_delivery(ctx, chain_id, seq)?;

        let header = self
            .header_sync
            .get_header_by_height(&*ctx, chain_id, height)
            .map_err(|e| match e {
                HeaderSyncError::HeaderNotFound { .. } => {
                    RelayError::UntrustedHeader { chain_id, height }
                }
                other => other.into(),
            })?;

        let key = request_key(&self.config.contract_address, chain_id, seq);
        let value = verify_proof(header.cross_states_root(), &key, &param.proof)?
            .ok_or(RelayError::RequestNotFound { chain_id, seq })?;
        let request = CreateCrossChainTxParam::from_bytes(&value).map_err(|source| {
            RelayError::MalformedRequest {
                chain_id,
                seq,
                source,
            }
        })?;
        if request.to_chain_id != chain_id {
            return Err(RelayError::RequestChainMismatch {
                chain_id,
                declared: request.to_chain_id,
            });
        }

        if self.is_protected(&request.dest_contract) {
            return Err(RelayError::ProtectedDestination {
                chain_id,
                seq,
                contract: hex::encode(request.dest_contract),
            });
        }

        let mut side_chain = self.registry.side_chain(&*ctx, chain_id)?;
        let fee_charge = side_chain.settle_fee(request.fee)?;
        self.registry.put_side_chain(ctx, &side_chain)?;
        if fee_charge > 0 {
            self.registry.pay_out(ctx, param.relayer, fee_charge)?;
        }

        let output = ctx
            .invoke_relayed(
                &self.config.contract_address,
                &request.dest_contract,
                &request.method,
                &request.args,
            )
            .map_err(|source| RelayError::RelayExecutionFailed {
                chain_id,
                seq,
                source,
            })?;

        ctx.notify(
            self.config.contract_address,
            PROCESS_CROSS_CHAIN_TX_EVENT,
            json!({
                "chainId": chain_id,
                "requestId": seq,
                "height": height,
                "relayer": hex::encode(param.relayer),
            }),
        );
        tracing::info!(
            "[qc-15] request {} of chain {} relayed via header {}, fee {}",
            seq,
            chain_id,
            height,
            fee_charge
        );
        Ok(RelayedRequest {
            chain_id,
            seq,
            height,
            request,
            fee_charge,
            output,
        })
    }

    fn current_id(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<u64, RelayError> {
        Ok(self.store.current_id(storage, chain_id)?)
    }

    fn remained_ids(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<RemainedIds, RelayError> {
        Ok(self.store.remained_ids(storage, chain_id)?)
    }
}
