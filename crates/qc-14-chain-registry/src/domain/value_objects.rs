//! # Value Objects
//!
//! Parameter blobs of the registry entry points. Addresses are var-bytes of
//! exactly 20 bytes, integers var-uints.

use shared_types::{Address, ChainId, CodecError, Decode, Encode, Sink, Source};

/// `initConfig`: set the registry administrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitConfigParam {
    /// Administrator address.
    pub admin: Address,
}

impl Encode for InitConfigParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_address(&self.admin);
    }
}

impl Decode for InitConfigParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            admin: source.read_address()?,
        })
    }
}

/// `registerSideChain`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterSideChainParam {
    /// Chain administrator, must witness the call.
    pub address: Address,
    /// Fee multiplier.
    pub ratio: u64,
    /// Deposit escrowed from the chain administrator.
    pub deposit: u64,
    /// Upper bound of the accrued fee pool.
    pub fee_pool_cap: u64,
    /// Serialized genesis header.
    pub genesis_header: Vec<u8>,
}

impl Encode for RegisterSideChainParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_address(&self.address);
        sink.write_var_uint(self.ratio);
        sink.write_var_uint(self.deposit);
        sink.write_var_uint(self.fee_pool_cap);
        sink.write_var_bytes(&self.genesis_header);
    }
}

impl Decode for RegisterSideChainParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            address: source.read_address()?,
            ratio: source.read_var_uint()?,
            deposit: source.read_var_uint()?,
            fee_pool_cap: source.read_var_uint()?,
            genesis_header: source.read_var_bytes()?.to_vec(),
        })
    }
}

/// `approveSideChain`, `rejectSideChain`, `approveQuitSideChain`,
/// `approveInflation`, `rejectInflation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideChainIdParam {
    /// Side-chain id.
    pub chain_id: ChainId,
}

impl Encode for SideChainIdParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.chain_id);
    }
}

impl Decode for SideChainIdParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            chain_id: source.read_var_uint()?,
        })
    }
}

/// `quitSideChain`: the chain administrator asks to leave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuitSideChainParam {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Chain administrator.
    pub address: Address,
}

/// `blackSideChain`: remove a misbehaving chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlackSideChainParam {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Receives the fee pool and the deposit.
    pub beneficiary: Address,
}

macro_rules! id_and_address {
    ($ty:ident, $field:ident) => {
        impl Encode for $ty {
            fn encode(&self, sink: &mut Sink) {
                sink.write_var_uint(self.chain_id);
                sink.write_address(&self.$field);
            }
        }

        impl Decode for $ty {
            fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
                Ok(Self {
                    chain_id: source.read_var_uint()?,
                    $field: source.read_address()?,
                })
            }
        }
    };
}

id_and_address!(QuitSideChainParam, address);
id_and_address!(BlackSideChainParam, beneficiary);

/// `inflation`: propose a fee-pool adjustment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InflationParam {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Chain administrator.
    pub address: Address,
    /// Additional deposit, escrowed immediately.
    pub deposit_add: u64,
    /// Fee-pool cap increase.
    pub pool_cap_add: u64,
}

impl Encode for InflationParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.chain_id);
        sink.write_address(&self.address);
        sink.write_var_uint(self.deposit_add);
        sink.write_var_uint(self.pool_cap_add);
    }
}

impl Decode for InflationParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            chain_id: source.read_var_uint()?,
            address: source.read_address()?,
            deposit_add: source.read_var_uint()?,
            pool_cap_add: source.read_var_uint()?,
        })
    }
}

/// `registerNodeToSideChain` and `quitNodeToSideChain`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeToSideChainParam {
    /// Hex public key of the governance peer.
    pub peer_pubkey: String,
    /// Peer owner, must witness the call.
    pub address: Address,
    /// Side-chain id.
    pub chain_id: ChainId,
}

impl Encode for NodeToSideChainParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_string(&self.peer_pubkey);
        sink.write_address(&self.address);
        sink.write_var_uint(self.chain_id);
    }
}

impl Decode for NodeToSideChainParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            peer_pubkey: source.read_string()?,
            address: source.read_address()?,
            chain_id: source.read_var_uint()?,
        })
    }
}
