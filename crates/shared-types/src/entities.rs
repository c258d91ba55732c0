//! # Core Domain Entities
//!
//! Primitive aliases and the observer notification shape.

use serde::{Deserialize, Serialize};

/// A 32-byte hash (double SHA-256 for headers, Keccak-256 for trie nodes).
pub type Hash = [u8; 32];

/// A 20-byte account or contract address.
pub type Address = [u8; 20];

/// Side-chain identifier carried in versioned headers.
pub type ChainId = u64;

/// The all-zero address.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Success payload returned by state-changing entry points.
pub const BYTE_TRUE: &[u8] = &[1];

/// Observer notification emitted by a committed invocation.
///
/// Notifications are purely observational; nothing inside the core reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Contract that emitted the event.
    #[serde(with = "hex_address")]
    pub contract: Address,
    /// Event name, e.g. `processCrossChainTx`.
    pub event: String,
    /// Structured event fields.
    pub fields: serde_json::Value,
}

impl Notification {
    /// Create a notification.
    pub fn new(contract: Address, event: impl Into<String>, fields: serde_json::Value) -> Self {
        Self {
            contract,
            event: event.into(),
            fields,
        }
    }
}

/// Serde helpers encoding an [`Address`] as a hex string.
pub mod hex_address {
    use super::Address;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize as lowercase hex.
    pub fn serialize<S: Serializer>(addr: &Address, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(addr))
    }

    /// Deserialize from hex; exactly 20 bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
        let text = String::deserialize(d)?;
        let bytes = hex::decode(&text).map_err(D::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| D::Error::custom("address must be 20 bytes"))
    }
}
