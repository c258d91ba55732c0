//! # Test Fixtures
//!
//! A main chain running the native runtime over in-memory storage, with a
//! token ledger, a recording destination contract and deterministic
//! validator keys for side chains.

use std::sync::Arc;

use node_runtime::{
    InvocationEnv, NativeError, NativeOutcome, NativeRegistry, RuntimeConfig, SubsystemContainer,
};
use qc_02_header_codec::{ConsensusPayload, Header, UnsignedHeader};
use qc_04_trie_proof::ProofTrie;
use qc_13_header_sync::SyncBlockHeaderParam;
use qc_14_chain_registry::{
    ChainRegistryApi, InMemoryPeerPool, InitConfigParam, RegisterSideChainParam, RegistryError,
    SideChain, SideChainIdParam,
};
use qc_15_cross_chain::{request_key, CreateCrossChainTxParam};
use shared_crypto::Secp256k1KeyPair;
use shared_types::{
    Address, ChainId, ContractRouter, Encode, Hash, InMemoryTokenLedger, MemoryStore,
    RecordingContract, SignerSet,
};

pub const ADMIN: Address = [0xAD; 20];
pub const CHAIN_ADMIN: Address = [0xCA; 20];
pub const USER: Address = [0x05; 20];
pub const RELAYER: Address = [0x06; 20];
pub const DEST: Address = [0xDE; 20];

pub const SIDE_CHAIN: ChainId = 7;
pub const STARTING_BALANCE: u64 = 10_000;

/// Deterministic validator keys `1..=n`.
pub fn validators(n: u8) -> Vec<Secp256k1KeyPair> {
    (1..=n)
        .map(|i| Secp256k1KeyPair::from_seed(i).unwrap())
        .collect()
}

fn announce(set: &[Secp256k1KeyPair]) -> Vec<u8> {
    ConsensusPayload::with_peers(
        set.iter()
            .enumerate()
            .map(|(i, k)| (i as u32 + 1, k.public_key())),
    )
    .to_bytes()
}

/// Unsigned genesis header announcing `set`.
pub fn genesis_header(chain_id: ChainId, set: &[Secp256k1KeyPair]) -> Vec<u8> {
    Header::new(UnsignedHeader {
        version: 1,
        chain_id,
        timestamp: 1_600_000_000,
        consensus_payload: announce(set),
        ..Default::default()
    })
    .serialize()
}

/// Header at `height` carrying `root`, signed by `signers`, optionally
/// announcing the next validator set.
pub fn signed_header(
    chain_id: ChainId,
    height: u32,
    root: Hash,
    signers: &[Secp256k1KeyPair],
    next: Option<&[Secp256k1KeyPair]>,
) -> Vec<u8> {
    let mut header = Header::new(UnsignedHeader {
        version: 1,
        chain_id,
        height,
        cross_states_root: root,
        timestamp: 1_600_000_000 + height,
        consensus_payload: next.map(announce).unwrap_or_default(),
        ..Default::default()
    });
    for k in signers {
        header.sign(k);
    }
    header.serialize()
}

/// Cross-chain request from [`USER`] to [`DEST`].
pub fn request(to_chain_id: ChainId, fee: u64, args: &[u8]) -> CreateCrossChainTxParam {
    CreateCrossChainTxParam {
        to_chain_id,
        fee,
        from: USER,
        dest_contract: DEST,
        method: "unlock".into(),
        args: args.to_vec(),
    }
}

/// A main chain node.
pub struct TestNetwork {
    pub native: NativeRegistry,
    pub store: MemoryStore,
    pub router: ContractRouter,
    pub token: InMemoryTokenLedger,
    pub dest: RecordingContract,
    pub peer_pool: Arc<InMemoryPeerPool>,
    pub height: u32,
}

impl TestNetwork {
    /// Runtime with the registry administrator set and funded accounts.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::for_testing())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let token = InMemoryTokenLedger::new(config.registry.token_contract);
        let dest = RecordingContract::new(DEST);
        let router = ContractRouter::new()
            .with_contract(token.address(), Arc::new(token.clone()))
            .with_contract(DEST, Arc::new(dest.clone()));
        let peer_pool = Arc::new(InMemoryPeerPool::new());
        let container = SubsystemContainer::new(config, peer_pool.clone());

        let mut net = Self {
            native: NativeRegistry::new(Arc::new(container)),
            store: MemoryStore::new(),
            router,
            token,
            dest,
            peer_pool,
            height: 1,
        };
        for owner in [CHAIN_ADMIN, USER] {
            net.token
                .mint(&mut net.store, &owner, STARTING_BALANCE)
                .unwrap();
        }
        net.call(&[ADMIN], "initConfig", InitConfigParam { admin: ADMIN }.to_bytes())
            .unwrap();
        net
    }

    /// One transaction signed by `signers`, in its own block.
    pub fn call(
        &mut self,
        signers: &[Address],
        method: &str,
        input: Vec<u8>,
    ) -> Result<NativeOutcome, NativeError> {
        self.height += 1;
        let witness = SignerSet::new(signers.iter().copied());
        let env = InvocationEnv {
            witness: &witness,
            calls: &self.router,
            height: self.height,
        };
        self.native.invoke(&mut self.store, env, method, &input)
    }

    pub fn balance(&self, owner: &Address) -> u64 {
        self.token.balance_of(&self.store, owner).unwrap()
    }

    pub fn escrow(&self) -> Address {
        self.native.container().registry.escrow_address()
    }

    pub fn side_chain(&self, chain_id: ChainId) -> Result<SideChain, RegistryError> {
        self.native
            .container()
            .registry
            .side_chain(&self.store, chain_id)
    }

    pub fn register(
        &mut self,
        chain_id: ChainId,
        set: &[Secp256k1KeyPair],
        deposit: u64,
        ratio: u64,
        cap: u64,
    ) -> Result<NativeOutcome, NativeError> {
        let param = RegisterSideChainParam {
            address: CHAIN_ADMIN,
            ratio,
            deposit,
            fee_pool_cap: cap,
            genesis_header: genesis_header(chain_id, set),
        };
        self.call(&[CHAIN_ADMIN], "registerSideChain", param.to_bytes())
    }

    pub fn approve(&mut self, chain_id: ChainId) -> Result<NativeOutcome, NativeError> {
        self.call(
            &[ADMIN],
            "approveSideChain",
            SideChainIdParam { chain_id }.to_bytes(),
        )
    }

    pub fn sync(&mut self, headers: Vec<Vec<u8>>) -> Result<NativeOutcome, NativeError> {
        self.call(&[], "syncBlockHeader", SyncBlockHeaderParam { headers }.to_bytes())
    }

    pub fn create(&mut self, param: &CreateCrossChainTxParam) -> Result<NativeOutcome, NativeError> {
        self.call(&[param.from], "createCrossChainTx", param.to_bytes())
    }

    /// Trie holding the stored payloads of requests `seqs` for `chain_id`,
    /// as the side chain would commit them.
    pub fn request_trie(&self, chain_id: ChainId, seqs: &[u64]) -> ProofTrie {
        let relay = &self.native.container().cross_chain;
        let mut trie = ProofTrie::new();
        for &seq in seqs {
            let payload = relay
                .store()
                .request(&self.store, chain_id, seq)
                .unwrap()
                .unwrap();
            trie.insert(&self.request_key(chain_id, seq), payload);
        }
        trie
    }

    pub fn request_key(&self, chain_id: ChainId, seq: u64) -> Vec<u8> {
        let relay = &self.native.container().cross_chain;
        request_key(&relay.config().contract_address, chain_id, seq)
    }
}
