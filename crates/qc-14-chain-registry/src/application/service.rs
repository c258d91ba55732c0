//! # Chain Registry Service
//!
//! Side-chain lifecycle, escrowed deposits, fee-pool adjustment and node
//! registration. Every entry point decodes its parameter blob, checks all
//! preconditions against the staged storage of the [`NativeContext`] and
//! fails as a whole; token movements are external calls through the same
//! context, so a failure after a transfer rolls the transfer back too.

use std::sync::Arc;

use qc_02_header_codec::Header;
use qc_13_header_sync::{ConsensusPeers, HeaderSyncApi, HeaderSyncError};
use serde_json::json;
use shared_types::{
    Address, ChainId, Decode, Encode, KvStore, NativeContext, Transfers, TRANSFER_METHOD,
};

use crate::adapters::RegistryStore;
use crate::config::RegistryConfig;
use crate::domain::{
    checked_credit, invariant_side_chain_id, BlackSideChainParam, InflationInfo, InflationParam,
    InitConfigParam, NodeToSideChain, NodeToSideChainParam, QuitSideChainParam,
    RegisterSideChainParam, RegistryError, SideChain, SideChainIdParam, SideChainStatus,
};
use crate::ports::{ChainRegistryApi, PeerPool};

/// Event emitted by `registerSideChain`.
pub const REGISTER_SIDE_CHAIN_EVENT: &str = "registerSideChain";
/// Event emitted by `approveSideChain`.
pub const APPROVE_SIDE_CHAIN_EVENT: &str = "approveSideChain";
/// Event emitted by `rejectSideChain`.
pub const REJECT_SIDE_CHAIN_EVENT: &str = "rejectSideChain";
/// Event emitted by `quitSideChain`.
pub const QUIT_SIDE_CHAIN_EVENT: &str = "quitSideChain";
/// Event emitted by `approveQuitSideChain`.
pub const APPROVE_QUIT_SIDE_CHAIN_EVENT: &str = "approveQuitSideChain";
/// Event emitted by `blackSideChain`.
pub const BLACK_SIDE_CHAIN_EVENT: &str = "blackSideChain";
/// Event emitted by `inflation`.
pub const INFLATION_EVENT: &str = "inflation";
/// Event emitted by `approveInflation`.
pub const APPROVE_INFLATION_EVENT: &str = "approveInflation";
/// Event emitted by `rejectInflation`.
pub const REJECT_INFLATION_EVENT: &str = "rejectInflation";

/// Chain Registry Service.
pub struct ChainRegistryService {
    config: RegistryConfig,
    store: RegistryStore,
    header_sync: Arc<dyn HeaderSyncApi>,
    peer_pool: Arc<dyn PeerPool>,
}

impl ChainRegistryService {
    /// Create a registry seeding headers through `header_sync` and checking
    /// node ownership against `peer_pool`.
    pub fn new(
        config: RegistryConfig,
        header_sync: Arc<dyn HeaderSyncApi>,
        peer_pool: Arc<dyn PeerPool>,
    ) -> Self {
        let store = RegistryStore::new(config.contract_address);
        Self {
            config,
            store,
            header_sync,
            peer_pool,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Storage layout used by this service.
    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// `initConfig`: set the registry administrator, once.
    pub fn init_config(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let param = InitConfigParam::from_bytes(input)?;
        if self.store.admin(&*ctx)?.is_some() {
            return Err(RegistryError::AlreadyInitialized);
        }
        require_witness(ctx, &param.admin, "registry administrator")?;
        self.store.put_admin(ctx, &param.admin)?;
        tracing::info!("[qc-14] registry administrator set to {}", hex::encode(param.admin));
        Ok(())
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// `registerSideChain`: escrow the deposit and record the chain as
    /// `Registered`.
    pub fn register_side_chain(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<SideChain, RegistryError> {
        let param = RegisterSideChainParam::from_bytes(input)?;
        require_witness(ctx, &param.address, "chain administrator")?;

        let genesis = Header::deserialize(&param.genesis_header)?;
        let chain_id = genesis.chain_id();
        invariant_side_chain_id(chain_id, self.config.main_chain_id)?;
        if ConsensusPeers::from_payload(&genesis.consensus_payload()?).is_none() {
            return Err(HeaderSyncError::GenesisWithoutValidators { chain_id }.into());
        }
        if self.store.side_chain(&*ctx, chain_id)?.is_some() {
            return Err(RegistryError::AlreadyRegistered { chain_id });
        }

        self.transfer(ctx, param.address, self.config.contract_address, param.deposit)?;
        let side_chain = SideChain {
            chain_id,
            admin: param.address,
            ratio: param.ratio,
            deposit: param.deposit,
            fee_pool: 0,
            fee_pool_cap: param.fee_pool_cap,
            status: SideChainStatus::Registered,
            genesis_header: param.genesis_header,
        };
        self.store.put_side_chain(ctx, &side_chain)?;

        ctx.notify(
            self.config.contract_address,
            REGISTER_SIDE_CHAIN_EVENT,
            json!({
                "chainId": chain_id,
                "admin": hex::encode(side_chain.admin),
                "ratio": side_chain.ratio,
                "deposit": side_chain.deposit,
                "feePoolCap": side_chain.fee_pool_cap,
            }),
        );
        tracing::info!(
            "[qc-14] side chain {} registered with deposit {}",
            chain_id,
            side_chain.deposit
        );
        Ok(side_chain)
    }

    /// `approveSideChain`: activate and seed header sync with the genesis.
    pub fn approve_side_chain(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let SideChainIdParam { chain_id } = SideChainIdParam::from_bytes(input)?;
        self.require_admin(ctx)?;
        let mut side_chain = self.load(ctx, chain_id)?;
        side_chain.require_status(SideChainStatus::Registered)?;

        side_chain.status = SideChainStatus::Active;
        self.store.put_side_chain(ctx, &side_chain)?;
        self.header_sync
            .init_genesis_header(ctx, &side_chain.genesis_header)?;

        ctx.notify(
            self.config.contract_address,
            APPROVE_SIDE_CHAIN_EVENT,
            json!({ "chainId": chain_id }),
        );
        tracing::info!("[qc-14] side chain {} approved", chain_id);
        Ok(())
    }

    /// `rejectSideChain`: drop a `Registered` chain and refund its deposit.
    pub fn reject_side_chain(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let SideChainIdParam { chain_id } = SideChainIdParam::from_bytes(input)?;
        self.require_admin(ctx)?;
        let side_chain = self.load(ctx, chain_id)?;
        side_chain.require_status(SideChainStatus::Registered)?;

        self.remove(ctx, chain_id)?;
        self.transfer(ctx, self.config.contract_address, side_chain.admin, side_chain.deposit)?;

        ctx.notify(
            self.config.contract_address,
            REJECT_SIDE_CHAIN_EVENT,
            json!({ "chainId": chain_id }),
        );
        tracing::info!("[qc-14] side chain {} rejected", chain_id);
        Ok(())
    }

    /// `quitSideChain`: the chain administrator asks to leave.
    pub fn quit_side_chain(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let param = QuitSideChainParam::from_bytes(input)?;
        require_witness(ctx, &param.address, "chain administrator")?;
        let mut side_chain = self.load(ctx, param.chain_id)?;
        require_chain_admin(&side_chain, &param.address)?;
        side_chain.require_status(SideChainStatus::Active)?;

        side_chain.status = SideChainStatus::Quitting;
        self.store.put_side_chain(ctx, &side_chain)?;

        ctx.notify(
            self.config.contract_address,
            QUIT_SIDE_CHAIN_EVENT,
            json!({ "chainId": param.chain_id }),
        );
        tracing::info!("[qc-14] side chain {} quitting", param.chain_id);
        Ok(())
    }

    /// `approveQuitSideChain`: remove a `Quitting` chain and refund its
    /// deposit and any pending inflation deposit.
    pub fn approve_quit_side_chain(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<(), RegistryError> {
        let SideChainIdParam { chain_id } = SideChainIdParam::from_bytes(input)?;
        self.require_admin(ctx)?;
        let side_chain = self.load(ctx, chain_id)?;
        side_chain.require_status(SideChainStatus::Quitting)?;

        self.refund_pending_inflation(ctx, chain_id)?;
        self.remove(ctx, chain_id)?;
        self.transfer(ctx, self.config.contract_address, side_chain.admin, side_chain.deposit)?;

        ctx.notify(
            self.config.contract_address,
            APPROVE_QUIT_SIDE_CHAIN_EVENT,
            json!({ "chainId": chain_id }),
        );
        tracing::info!("[qc-14] side chain {} removed after quit", chain_id);
        Ok(())
    }

    /// `blackSideChain`: remove a chain in any status, paying its fee pool
    /// and deposit to the beneficiary.
    pub fn black_side_chain(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let param = BlackSideChainParam::from_bytes(input)?;
        self.require_admin(ctx)?;
        let side_chain = self.load(ctx, param.chain_id)?;
        let amount = checked_credit(side_chain.fee_pool, side_chain.deposit, "slashed amount")?;

        self.refund_pending_inflation(ctx, param.chain_id)?;
        self.remove(ctx, param.chain_id)?;
        self.transfer(ctx, self.config.contract_address, param.beneficiary, amount)?;

        ctx.notify(
            self.config.contract_address,
            BLACK_SIDE_CHAIN_EVENT,
            json!({
                "chainId": param.chain_id,
                "beneficiary": hex::encode(param.beneficiary),
                "amount": amount,
            }),
        );
        tracing::warn!(
            "[qc-14] side chain {} blacklisted, {} paid to {}",
            param.chain_id,
            amount,
            hex::encode(param.beneficiary)
        );
        Ok(())
    }

    // =========================================================================
    // FEE POOL ADJUSTMENT
    // =========================================================================

    /// `inflation`: the chain administrator proposes raising the deposit
    /// and the fee-pool cap. The added deposit is escrowed now.
    pub fn inflation(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let param = InflationParam::from_bytes(input)?;
        require_witness(ctx, &param.address, "chain administrator")?;
        let side_chain = self.load(ctx, param.chain_id)?;
        require_chain_admin(&side_chain, &param.address)?;
        side_chain.require_status(SideChainStatus::Active)?;

        self.refund_pending_inflation(ctx, param.chain_id)?;
        self.transfer(ctx, param.address, self.config.contract_address, param.deposit_add)?;
        self.store.put_inflation(
            ctx,
            &InflationInfo {
                chain_id: param.chain_id,
                proposer: param.address,
                deposit_add: param.deposit_add,
                pool_cap_add: param.pool_cap_add,
            },
        )?;

        ctx.notify(
            self.config.contract_address,
            INFLATION_EVENT,
            json!({
                "chainId": param.chain_id,
                "depositAdd": param.deposit_add,
                "poolCapAdd": param.pool_cap_add,
            }),
        );
        Ok(())
    }

    /// `approveInflation`: apply the pending adjustment.
    pub fn approve_inflation(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let SideChainIdParam { chain_id } = SideChainIdParam::from_bytes(input)?;
        self.require_admin(ctx)?;
        let mut side_chain = self.load(ctx, chain_id)?;
        let pending = self
            .store
            .inflation(&*ctx, chain_id)?
            .ok_or(RegistryError::NoPendingInflation { chain_id })?;

        side_chain.deposit = checked_credit(side_chain.deposit, pending.deposit_add, "deposit")?;
        side_chain.fee_pool_cap =
            checked_credit(side_chain.fee_pool_cap, pending.pool_cap_add, "fee pool cap")?;
        self.store.put_side_chain(ctx, &side_chain)?;
        self.store.delete_inflation(ctx, chain_id)?;

        ctx.notify(
            self.config.contract_address,
            APPROVE_INFLATION_EVENT,
            json!({
                "chainId": chain_id,
                "deposit": side_chain.deposit,
                "feePoolCap": side_chain.fee_pool_cap,
            }),
        );
        tracing::info!(
            "[qc-14] side chain {} deposit {} cap {}",
            chain_id,
            side_chain.deposit,
            side_chain.fee_pool_cap
        );
        Ok(())
    }

    /// `rejectInflation`: drop the pending adjustment and refund it.
    pub fn reject_inflation(&self, ctx: &mut NativeContext<'_>, input: &[u8]) -> Result<(), RegistryError> {
        let SideChainIdParam { chain_id } = SideChainIdParam::from_bytes(input)?;
        self.require_admin(ctx)?;
        if !self.refund_pending_inflation(ctx, chain_id)? {
            return Err(RegistryError::NoPendingInflation { chain_id });
        }
        ctx.notify(
            self.config.contract_address,
            REJECT_INFLATION_EVENT,
            json!({ "chainId": chain_id }),
        );
        Ok(())
    }

    // =========================================================================
    // SIDE-CHAIN NODES
    // =========================================================================

    /// `registerNodeToSideChain`: attach a governance peer owned by the
    /// caller to a side chain.
    pub fn register_node_to_side_chain(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<(), RegistryError> {
        let param = NodeToSideChainParam::from_bytes(input)?;
        require_witness(ctx, &param.address, "peer owner")?;
        self.load(ctx, param.chain_id)?;

        let peer = param.peer_pubkey.to_lowercase();
        match self.peer_pool.peer_owner(&*ctx, &peer)? {
            None => return Err(RegistryError::PeerNotInPool(peer)),
            Some(owner) if owner != param.address => return Err(RegistryError::NotPeerOwner(peer)),
            Some(_) => {}
        }

        let mut info = self.store.node_info(&*ctx, param.chain_id)?;
        info.nodes.insert(
            peer.clone(),
            NodeToSideChain {
                chain_id: param.chain_id,
                address: param.address,
                peer_pubkey: peer.clone(),
            },
        );
        self.store.put_node_info(ctx, &info)?;
        tracing::info!("[qc-14] peer {} serves side chain {}", peer, param.chain_id);
        Ok(())
    }

    /// `quitNodeToSideChain`: detach a peer from a side chain.
    pub fn quit_node_to_side_chain(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<(), RegistryError> {
        let param = NodeToSideChainParam::from_bytes(input)?;
        require_witness(ctx, &param.address, "peer owner")?;

        let peer = param.peer_pubkey.to_lowercase();
        let mut info = self.store.node_info(&*ctx, param.chain_id)?;
        let node = info
            .nodes
            .get(&peer)
            .ok_or_else(|| RegistryError::NodeNotRegistered {
                chain_id: param.chain_id,
                peer: peer.clone(),
            })?;
        if node.address != param.address {
            return Err(RegistryError::NotPeerOwner(peer));
        }
        info.nodes.remove(&peer);
        self.store.put_node_info(ctx, &info)?;
        tracing::info!("[qc-14] peer {} left side chain {}", peer, param.chain_id);
        Ok(())
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn require_admin(&self, ctx: &NativeContext<'_>) -> Result<(), RegistryError> {
        let admin = self.store.admin(ctx)?.ok_or(RegistryError::NotInitialized)?;
        require_witness(ctx, &admin, "registry administrator")
    }

    fn load(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<SideChain, RegistryError> {
        self.store
            .side_chain(storage, chain_id)?
            .ok_or(RegistryError::SideChainNotFound { chain_id })
    }

    /// Delete the entry of `chain_id` and retire its trusted headers.
    fn remove(&self, ctx: &mut NativeContext<'_>, chain_id: ChainId) -> Result<(), RegistryError> {
        self.store.delete_side_chain(ctx, chain_id)?;
        self.header_sync.remove_chain(ctx, chain_id)?;
        Ok(())
    }

    /// Refund and drop the pending inflation of `chain_id`, if any.
    fn refund_pending_inflation(
        &self,
        ctx: &mut NativeContext<'_>,
        chain_id: ChainId,
    ) -> Result<bool, RegistryError> {
        let Some(pending) = self.store.inflation(&*ctx, chain_id)? else {
            return Ok(false);
        };
        self.store.delete_inflation(ctx, chain_id)?;
        self.transfer(ctx, self.config.contract_address, pending.proposer, pending.deposit_add)?;
        Ok(true)
    }

    fn transfer(
        &self,
        ctx: &mut NativeContext<'_>,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), RegistryError> {
        if amount == 0 {
            return Ok(());
        }
        let args = Transfers::single(from, to, amount).to_bytes();
        ctx.invoke(&self.config.contract_address, &self.config.token_contract, TRANSFER_METHOD, &args)?;
        Ok(())
    }
}

fn require_witness(ctx: &NativeContext<'_>, address: &Address, role: &str) -> Result<(), RegistryError> {
    if ctx.check_witness(address) {
        Ok(())
    } else {
        Err(RegistryError::Unauthorized(format!(
            "missing witness of {} {}",
            role,
            hex::encode(address)
        )))
    }
}

fn require_chain_admin(side_chain: &SideChain, address: &Address) -> Result<(), RegistryError> {
    if &side_chain.admin == address {
        Ok(())
    } else {
        Err(RegistryError::Unauthorized(format!(
            "{} is not the administrator of side chain {}",
            hex::encode(address),
            side_chain.chain_id
        )))
    }
}

impl ChainRegistryApi for ChainRegistryService {
    fn side_chain(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<SideChain, RegistryError> {
        self.load(storage, chain_id)
    }

    fn put_side_chain(
        &self,
        storage: &mut dyn KvStore,
        side_chain: &SideChain,
    ) -> Result<(), RegistryError> {
        Ok(self.store.put_side_chain(storage, side_chain)?)
    }

    fn escrow_address(&self) -> Address {
        self.config.contract_address
    }

    fn pay_out(&self, ctx: &mut NativeContext<'_>, to: Address, amount: u64) -> Result<(), RegistryError> {
        self.transfer(ctx, self.config.contract_address, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPeerPool;
    use qc_02_header_codec::{ConsensusPayload, UnsignedHeader};
    use qc_13_header_sync::{HeaderSyncConfig, HeaderSyncService};
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{ContractRouter, InMemoryTokenLedger, MemoryStore, SignerSet};

    const CHAIN: ChainId = 7;
    const ADMIN: Address = [0xAD; 20];
    const CHAIN_ADMIN: Address = [0xCA; 20];
    const OTHER: Address = [0x0B; 20];

    fn genesis(chain_id: ChainId, with_validators: bool) -> Vec<u8> {
        let keys: Vec<_> = (1..=4u8)
            .map(|i| Secp256k1KeyPair::from_seed(i).unwrap())
            .collect();
        let payload = if with_validators {
            ConsensusPayload::with_peers(
                keys.iter()
                    .enumerate()
                    .map(|(i, k)| (i as u32 + 1, k.public_key())),
            )
            .to_bytes()
        } else {
            Vec::new()
        };
        Header::new(UnsignedHeader {
            version: 1,
            chain_id,
            consensus_payload: payload,
            ..Default::default()
        })
        .serialize()
    }

    fn register_param(deposit: u64) -> Vec<u8> {
        RegisterSideChainParam {
            address: CHAIN_ADMIN,
            ratio: 2,
            deposit,
            fee_pool_cap: 5000,
            genesis_header: genesis(CHAIN, true),
        }
        .to_bytes()
    }

    fn id(chain_id: ChainId) -> Vec<u8> {
        SideChainIdParam { chain_id }.to_bytes()
    }

    struct Harness {
        service: ChainRegistryService,
        header_sync: Arc<HeaderSyncService>,
        peers: Arc<InMemoryPeerPool>,
        token: InMemoryTokenLedger,
        store: MemoryStore,
        router: ContractRouter,
        signers: SignerSet,
    }

    impl Harness {
        fn new() -> Self {
            let config = RegistryConfig::for_testing();
            let token = InMemoryTokenLedger::new(config.token_contract);
            let router = ContractRouter::new().with_contract(config.token_contract, Arc::new(token.clone()));
            let header_sync = Arc::new(HeaderSyncService::new(HeaderSyncConfig::for_testing()));
            let peers = Arc::new(InMemoryPeerPool::new());
            let service = ChainRegistryService::new(config, header_sync.clone(), peers.clone());

            let mut store = MemoryStore::new();
            token.mint(&mut store, &CHAIN_ADMIN, 10_000).unwrap();
            let mut h = Self {
                service,
                header_sync,
                peers,
                token,
                store,
                router,
                signers: SignerSet::new([ADMIN, CHAIN_ADMIN]),
            };
            let init = InitConfigParam { admin: ADMIN }.to_bytes();
            h.run(|s, ctx| s.init_config(ctx, &init)).unwrap();
            h
        }

        fn run<T>(
            &mut self,
            op: impl FnOnce(&ChainRegistryService, &mut NativeContext<'_>) -> Result<T, RegistryError>,
        ) -> Result<T, RegistryError> {
            let mut ctx = NativeContext::new(&self.store, &self.signers, &self.router)
                .with_event_log(true);
            let out = op(&self.service, &mut ctx)?;
            ctx.finish().changes.apply(&mut self.store).unwrap();
            Ok(out)
        }

        fn balance(&self, owner: &Address) -> u64 {
            self.token.balance_of(&self.store, owner).unwrap()
        }

        fn escrow(&self) -> u64 {
            self.balance(&self.service.escrow_address())
        }

        fn status(&self) -> Option<SideChainStatus> {
            self.service
                .store()
                .side_chain(&self.store, CHAIN)
                .unwrap()
                .map(|c| c.status)
        }

        fn registered(deposit: u64) -> Self {
            let mut h = Self::new();
            let param = register_param(deposit);
            h.run(|s, ctx| s.register_side_chain(ctx, &param)).unwrap();
            h
        }

        fn active(deposit: u64) -> Self {
            let mut h = Self::registered(deposit);
            h.run(|s, ctx| s.approve_side_chain(ctx, &id(CHAIN))).unwrap();
            h
        }
    }

    #[test]
    fn test_init_config_once() {
        let mut h = Harness::new();
        let init = InitConfigParam { admin: OTHER }.to_bytes();
        let err = h.run(|s, ctx| s.init_config(ctx, &init)).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyInitialized));
    }

    #[test]
    fn test_register_escrows_deposit() {
        let h = Harness::registered(1000);
        assert_eq!(h.status(), Some(SideChainStatus::Registered));
        assert_eq!(h.balance(&CHAIN_ADMIN), 9000);
        assert_eq!(h.escrow(), 1000);
    }

    #[test]
    fn test_register_twice_rejected() {
        let mut h = Harness::registered(1000);
        let param = register_param(1000);
        let err = h.run(|s, ctx| s.register_side_chain(ctx, &param)).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered { chain_id: CHAIN }));
        assert_eq!(h.balance(&CHAIN_ADMIN), 9000);
    }

    #[test]
    fn test_register_requires_chain_admin_witness() {
        let mut h = Harness::new();
        h.signers = SignerSet::new([ADMIN]);
        let param = register_param(1000);
        let err = h.run(|s, ctx| s.register_side_chain(ctx, &param)).unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized(_)));
    }

    #[test]
    fn test_register_rejects_main_chain_id() {
        let mut h = Harness::new();
        let param = RegisterSideChainParam {
            address: CHAIN_ADMIN,
            ratio: 1,
            deposit: 1,
            fee_pool_cap: 1,
            genesis_header: genesis(0, true),
        }
        .to_bytes();
        let err = h.run(|s, ctx| s.register_side_chain(ctx, &param)).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidChainId { chain_id: 0 }));
    }

    #[test]
    fn test_register_rejects_bad_genesis() {
        let mut h = Harness::new();
        let mut param = RegisterSideChainParam {
            address: CHAIN_ADMIN,
            ratio: 1,
            deposit: 1,
            fee_pool_cap: 1,
            genesis_header: vec![0xFF; 8],
        };
        let raw = param.to_bytes();
        let err = h.run(|s, ctx| s.register_side_chain(ctx, &raw)).unwrap_err();
        assert!(matches!(err, RegistryError::Header(_)));

        param.genesis_header = genesis(CHAIN, false);
        let raw = param.to_bytes();
        let err = h.run(|s, ctx| s.register_side_chain(ctx, &raw)).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::HeaderSync(HeaderSyncError::GenesisWithoutValidators { .. })
        ));
    }

    #[test]
    fn test_register_fails_without_funds() {
        let mut h = Harness::new();
        let param = register_param(20_000);
        let err = h.run(|s, ctx| s.register_side_chain(ctx, &param)).unwrap_err();
        assert!(matches!(err, RegistryError::Transfer(_)));
        assert_eq!(h.status(), None);
    }

    #[test]
    fn test_approve_seeds_header_sync() {
        let h = Harness::active(1000);
        assert_eq!(h.status(), Some(SideChainStatus::Active));
        assert_eq!(
            h.header_sync.current_height(&h.store, CHAIN).unwrap(),
            Some(0)
        );
        assert_eq!(h.header_sync.get_consensus_peers(&h.store, CHAIN, 10).unwrap().1.len(), 4);
    }

    #[test]
    fn test_admin_operations_require_admin_witness() {
        let mut h = Harness::registered(1000);
        h.signers = SignerSet::new([CHAIN_ADMIN]);
        let err = h.run(|s, ctx| s.approve_side_chain(ctx, &id(CHAIN))).unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized(_)));
        assert_eq!(h.status(), Some(SideChainStatus::Registered));
    }

    #[test]
    fn test_approve_twice_rejected() {
        let mut h = Harness::active(1000);
        let err = h.run(|s, ctx| s.approve_side_chain(ctx, &id(CHAIN))).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidStateTransition {
                expected: SideChainStatus::Registered,
                actual: SideChainStatus::Active,
                ..
            }
        ));
    }

    #[test]
    fn test_reject_refunds_deposit() {
        let mut h = Harness::registered(1000);
        h.run(|s, ctx| s.reject_side_chain(ctx, &id(CHAIN))).unwrap();
        assert_eq!(h.status(), None);
        assert_eq!(h.balance(&CHAIN_ADMIN), 10_000);
        assert_eq!(h.escrow(), 0);
    }

    #[test]
    fn test_lifecycle_refunds_deposit_once() {
        let mut h = Harness::active(1000);
        let quit = QuitSideChainParam {
            chain_id: CHAIN,
            address: CHAIN_ADMIN,
        }
        .to_bytes();
        h.run(|s, ctx| s.quit_side_chain(ctx, &quit)).unwrap();
        assert_eq!(h.status(), Some(SideChainStatus::Quitting));

        h.run(|s, ctx| s.approve_quit_side_chain(ctx, &id(CHAIN))).unwrap();
        assert_eq!(h.status(), None);
        assert_eq!(h.balance(&CHAIN_ADMIN), 10_000);

        let err = h
            .run(|s, ctx| s.approve_quit_side_chain(ctx, &id(CHAIN)))
            .unwrap_err();
        assert!(matches!(err, RegistryError::SideChainNotFound { chain_id: CHAIN }));
        assert_eq!(h.balance(&CHAIN_ADMIN), 10_000);
    }

    #[test]
    fn test_quit_requires_active() {
        let mut h = Harness::registered(1000);
        let quit = QuitSideChainParam {
            chain_id: CHAIN,
            address: CHAIN_ADMIN,
        }
        .to_bytes();
        let err = h.run(|s, ctx| s.quit_side_chain(ctx, &quit)).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidStateTransition {
                expected: SideChainStatus::Active,
                actual: SideChainStatus::Registered,
                ..
            }
        ));
    }

    #[test]
    fn test_quit_by_stranger_rejected() {
        let mut h = Harness::active(1000);
        h.signers = SignerSet::new([OTHER]);
        let quit = QuitSideChainParam {
            chain_id: CHAIN,
            address: OTHER,
        }
        .to_bytes();
        let err = h.run(|s, ctx| s.quit_side_chain(ctx, &quit)).unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized(_)));
    }

    #[test]
    fn test_black_pays_pool_and_deposit() {
        let mut h = Harness::active(1000);
        let mut chain = h.service.side_chain(&h.store, CHAIN).unwrap();
        chain.fee_pool = 300;
        h.service.put_side_chain(&mut h.store, &chain).unwrap();
        let escrow = h.service.escrow_address();
        h.token.mint(&mut h.store, &escrow, 300).unwrap();

        let black = BlackSideChainParam {
            chain_id: CHAIN,
            beneficiary: OTHER,
        }
        .to_bytes();
        h.run(|s, ctx| s.black_side_chain(ctx, &black)).unwrap();
        assert_eq!(h.status(), None);
        assert_eq!(h.balance(&OTHER), 1300);
        assert_eq!(h.escrow(), 0);
    }

    #[test]
    fn test_blacklisted_id_can_register_again() {
        let mut h = Harness::active(1000);
        let black = BlackSideChainParam {
            chain_id: CHAIN,
            beneficiary: OTHER,
        }
        .to_bytes();
        h.run(|s, ctx| s.black_side_chain(ctx, &black)).unwrap();
        assert!(h
            .header_sync
            .get_consensus_peers(&h.store, CHAIN, 0)
            .is_err());

        let param = register_param(1000);
        h.run(|s, ctx| s.register_side_chain(ctx, &param)).unwrap();
        h.run(|s, ctx| s.approve_side_chain(ctx, &id(CHAIN))).unwrap();
        assert_eq!(h.status(), Some(SideChainStatus::Active));
        let (key_height, peers) = h.header_sync.get_consensus_peers(&h.store, CHAIN, 0).unwrap();
        assert_eq!(key_height, 0);
        assert_eq!(peers.len(), 4);
    }

    #[test]
    fn test_black_overflow_is_fatal() {
        let mut h = Harness::active(1000);
        let mut chain = h.service.side_chain(&h.store, CHAIN).unwrap();
        chain.fee_pool = u64::MAX;
        h.service.put_side_chain(&mut h.store, &chain).unwrap();

        let black = BlackSideChainParam {
            chain_id: CHAIN,
            beneficiary: OTHER,
        }
        .to_bytes();
        let err = h.run(|s, ctx| s.black_side_chain(ctx, &black)).unwrap_err();
        assert!(matches!(err, RegistryError::ArithmeticOverflow(_)));
        assert_eq!(h.status(), Some(SideChainStatus::Active));
    }

    fn inflation(deposit_add: u64, pool_cap_add: u64) -> Vec<u8> {
        InflationParam {
            chain_id: CHAIN,
            address: CHAIN_ADMIN,
            deposit_add,
            pool_cap_add,
        }
        .to_bytes()
    }

    #[test]
    fn test_inflation_approved() {
        let mut h = Harness::active(1000);
        let raw = inflation(500, 2000);
        h.run(|s, ctx| s.inflation(ctx, &raw)).unwrap();
        assert_eq!(h.balance(&CHAIN_ADMIN), 8500);

        h.run(|s, ctx| s.approve_inflation(ctx, &id(CHAIN))).unwrap();
        let chain = h.service.side_chain(&h.store, CHAIN).unwrap();
        assert_eq!(chain.deposit, 1500);
        assert_eq!(chain.fee_pool_cap, 7000);

        let err = h.run(|s, ctx| s.approve_inflation(ctx, &id(CHAIN))).unwrap_err();
        assert!(matches!(err, RegistryError::NoPendingInflation { .. }));
    }

    #[test]
    fn test_inflation_overwrite_refunds_superseded() {
        let mut h = Harness::active(1000);
        let first = inflation(500, 0);
        let second = inflation(200, 0);
        h.run(|s, ctx| s.inflation(ctx, &first)).unwrap();
        h.run(|s, ctx| s.inflation(ctx, &second)).unwrap();
        assert_eq!(h.balance(&CHAIN_ADMIN), 8800);
        assert_eq!(h.escrow(), 1200);

        h.run(|s, ctx| s.reject_inflation(ctx, &id(CHAIN))).unwrap();
        assert_eq!(h.balance(&CHAIN_ADMIN), 9000);
        assert_eq!(h.service.side_chain(&h.store, CHAIN).unwrap().deposit, 1000);
    }

    #[test]
    fn test_inflation_overflow_leaves_proposal() {
        let mut h = Harness::active(1000);
        let raw = inflation(0, u64::MAX);
        h.run(|s, ctx| s.inflation(ctx, &raw)).unwrap();
        let err = h.run(|s, ctx| s.approve_inflation(ctx, &id(CHAIN))).unwrap_err();
        assert!(matches!(err, RegistryError::ArithmeticOverflow("fee pool cap")));
        assert!(h.service.store().inflation(&h.store, CHAIN).unwrap().is_some());
    }

    #[test]
    fn test_approve_quit_refunds_pending_inflation() {
        let mut h = Harness::active(1000);
        let raw = inflation(500, 0);
        h.run(|s, ctx| s.inflation(ctx, &raw)).unwrap();
        let quit = QuitSideChainParam {
            chain_id: CHAIN,
            address: CHAIN_ADMIN,
        }
        .to_bytes();
        h.run(|s, ctx| s.quit_side_chain(ctx, &quit)).unwrap();
        h.run(|s, ctx| s.approve_quit_side_chain(ctx, &id(CHAIN))).unwrap();
        assert_eq!(h.balance(&CHAIN_ADMIN), 10_000);
        assert_eq!(h.escrow(), 0);
    }

    #[test]
    fn test_node_registration() {
        let mut h = Harness::active(1000);
        h.signers = SignerSet::new([OTHER]);
        h.peers.insert("02aa", OTHER);
        h.peers.insert("02bb", CHAIN_ADMIN);

        let node = |peer: &str| {
            NodeToSideChainParam {
                peer_pubkey: peer.into(),
                address: OTHER,
                chain_id: CHAIN,
            }
            .to_bytes()
        };

        let raw = node("02AA");
        h.run(|s, ctx| s.register_node_to_side_chain(ctx, &raw)).unwrap();
        let info = h.service.store().node_info(&h.store, CHAIN).unwrap();
        assert!(info.nodes.contains_key("02aa"));

        let raw = node("02bb");
        let err = h.run(|s, ctx| s.register_node_to_side_chain(ctx, &raw)).unwrap_err();
        assert!(matches!(err, RegistryError::NotPeerOwner(_)));

        let raw = node("02cc");
        let err = h.run(|s, ctx| s.register_node_to_side_chain(ctx, &raw)).unwrap_err();
        assert!(matches!(err, RegistryError::PeerNotInPool(_)));

        let raw = node("02aa");
        h.run(|s, ctx| s.quit_node_to_side_chain(ctx, &raw)).unwrap();
        let err = h.run(|s, ctx| s.quit_node_to_side_chain(ctx, &raw)).unwrap_err();
        assert!(matches!(err, RegistryError::NodeNotRegistered { .. }));
    }

    #[test]
    fn test_events_emitted() {
        let h = Harness::registered(1000);
        let mut ctx = NativeContext::new(&h.store, &h.signers, &h.router).with_event_log(true);
        h.service.approve_side_chain(&mut ctx, &id(CHAIN)).unwrap();
        let invocation = ctx.finish();
        assert_eq!(invocation.notifications.len(), 1);
        assert_eq!(invocation.notifications[0].event, APPROVE_SIDE_CHAIN_EVENT);
        assert_eq!(invocation.notifications[0].fields["chainId"], CHAIN);
    }
}
