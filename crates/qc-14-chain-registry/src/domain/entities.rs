//! # Domain Entities
//!
//! Side-chain records kept by the registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::{hex_address, Address, ChainId, CodecError, Decode, Encode, Sink, Source};

use super::errors::RegistryError;

// =============================================================================
// SIDE CHAIN
// =============================================================================

/// Lifecycle status of a registered side chain.
///
/// ```text
/// Registered ──approve──▶ Active ──quit──▶ Quitting ──approve quit──▶ (removed)
///     │                     │                 │
///     └──reject──▶ (removed)└──── black ──────┴──▶ (removed)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SideChainStatus {
    /// Registered, waiting for approval.
    Registered = 0,
    /// Approved; headers are synced and requests relayed.
    Active = 1,
    /// Asked to leave; still relays until the quit is approved.
    Quitting = 2,
}

impl TryFrom<u8> for SideChainStatus {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Registered),
            1 => Ok(Self::Active),
            2 => Ok(Self::Quitting),
            other => Err(CodecError::InvalidValue(format!(
                "side-chain status {}",
                other
            ))),
        }
    }
}

/// A side chain known to the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideChain {
    /// Chain id, taken from the genesis header.
    pub chain_id: ChainId,
    /// Chain administrator.
    #[serde(with = "hex_address")]
    pub admin: Address,
    /// Fee multiplier applied to every cross-chain request.
    pub ratio: u64,
    /// Deposit held in escrow.
    pub deposit: u64,
    /// Accrued fee pool.
    pub fee_pool: u64,
    /// Upper bound of the accrued fee pool.
    pub fee_pool_cap: u64,
    /// Lifecycle status.
    pub status: SideChainStatus,
    /// Serialized genesis header.
    #[serde(with = "hex_bytes")]
    pub genesis_header: Vec<u8>,
}

impl SideChain {
    /// True if cross-chain requests may target this chain.
    pub fn accepts_cross_chain(&self) -> bool {
        matches!(
            self.status,
            SideChainStatus::Active | SideChainStatus::Quitting
        )
    }

    /// Fee charge for a request declaring `fee`.
    pub fn fee_charge(&self, fee: u64) -> Result<u64, RegistryError> {
        fee.checked_mul(self.ratio)
            .ok_or(RegistryError::ArithmeticOverflow("fee charge"))
    }

    /// Accrue the charge for `fee` into the pool, respecting the cap.
    pub fn charge_fee(&mut self, fee: u64) -> Result<u64, RegistryError> {
        let charge = self.fee_charge(fee)?;
        let pool = self
            .fee_pool
            .checked_add(charge)
            .ok_or(RegistryError::ArithmeticOverflow("fee pool"))?;
        if pool > self.fee_pool_cap {
            return Err(RegistryError::FeePoolCapExceeded {
                chain_id: self.chain_id,
                pool: self.fee_pool,
                charge,
                cap: self.fee_pool_cap,
            });
        }
        self.fee_pool = pool;
        Ok(charge)
    }

    /// Pay the charge for `fee` out of the pool.
    pub fn settle_fee(&mut self, fee: u64) -> Result<u64, RegistryError> {
        let charge = self.fee_charge(fee)?;
        self.fee_pool = self
            .fee_pool
            .checked_sub(charge)
            .ok_or(RegistryError::InsufficientFeePool {
                chain_id: self.chain_id,
                pool: self.fee_pool,
                required: charge,
            })?;
        Ok(charge)
    }

    /// Fail unless the chain is in `expected`.
    pub fn require_status(&self, expected: SideChainStatus) -> Result<(), RegistryError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(RegistryError::InvalidStateTransition {
                chain_id: self.chain_id,
                expected,
                actual: self.status,
            })
        }
    }
}

impl Encode for SideChain {
    fn encode(&self, sink: &mut Sink) {
        sink.write_u64(self.chain_id);
        sink.write_bytes(&self.admin);
        sink.write_u64(self.ratio);
        sink.write_u64(self.deposit);
        sink.write_u64(self.fee_pool);
        sink.write_u64(self.fee_pool_cap);
        sink.write_u8(self.status as u8);
        sink.write_var_bytes(&self.genesis_header);
    }
}

impl Decode for SideChain {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            chain_id: source.read_u64()?,
            admin: source.read_fixed_address()?,
            ratio: source.read_u64()?,
            deposit: source.read_u64()?,
            fee_pool: source.read_u64()?,
            fee_pool_cap: source.read_u64()?,
            status: SideChainStatus::try_from(source.read_u8()?)?,
            genesis_header: source.read_var_bytes()?.to_vec(),
        })
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// INFLATION
// =============================================================================

/// Pending fee-pool adjustment proposed by a chain admin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InflationInfo {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Proposer, refunded on rejection or supersession.
    pub proposer: Address,
    /// Deposit added on approval, already escrowed.
    pub deposit_add: u64,
    /// Fee-pool cap increase applied on approval.
    pub pool_cap_add: u64,
}

impl Encode for InflationInfo {
    fn encode(&self, sink: &mut Sink) {
        sink.write_u64(self.chain_id);
        sink.write_bytes(&self.proposer);
        sink.write_u64(self.deposit_add);
        sink.write_u64(self.pool_cap_add);
    }
}

impl Decode for InflationInfo {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            chain_id: source.read_u64()?,
            proposer: source.read_fixed_address()?,
            deposit_add: source.read_u64()?,
            pool_cap_add: source.read_u64()?,
        })
    }
}

// =============================================================================
// NODES
// =============================================================================

/// A governance peer serving a side chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeToSideChain {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Owner of the peer.
    pub address: Address,
    /// Hex public key of the peer.
    pub peer_pubkey: String,
}

/// Peers registered to one side chain, keyed by public key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideChainNodeInfo {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Registered nodes.
    pub nodes: BTreeMap<String, NodeToSideChain>,
}

impl SideChainNodeInfo {
    /// Empty node set for `chain_id`.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            nodes: BTreeMap::new(),
        }
    }
}

impl Encode for SideChainNodeInfo {
    fn encode(&self, sink: &mut Sink) {
        sink.write_u64(self.chain_id);
        sink.write_u32(self.nodes.len() as u32);
        // descending by peer key
        for node in self.nodes.values().rev() {
            sink.write_u64(node.chain_id);
            sink.write_address(&node.address);
            sink.write_string(&node.peer_pubkey);
        }
    }
}

impl Decode for SideChainNodeInfo {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let chain_id = source.read_u64()?;
        let count = source.read_u32()?;
        let mut nodes = BTreeMap::new();
        for _ in 0..count {
            let node = NodeToSideChain {
                chain_id: source.read_u64()?,
                address: source.read_address()?,
                peer_pubkey: source.read_string()?,
            };
            if nodes.insert(node.peer_pubkey.clone(), node).is_some() {
                return Err(CodecError::InvalidValue("duplicate side-chain node".into()));
            }
        }
        Ok(Self { chain_id, nodes })
    }
}
