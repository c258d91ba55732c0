//! # Consensus Payload
//!
//! JSON document carried in `consensus_payload`. A header announcing a new
//! validator set carries:
//!
//! ```text
//! {"new_chain_config": {"peers": [{"index": 1, "id": "02ab..."}]}}
//! ```
//!
//! An empty payload, or one without `new_chain_config`, announces nothing.

use serde::{Deserialize, Serialize};
use shared_crypto::Secp256k1PublicKey;

use super::errors::HeaderError;

/// One validator in an announced set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    /// Position of the validator in the set.
    pub index: u32,
    /// Hex of the validator's compressed public key.
    pub id: String,
}

/// Validator set announced by a header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Validators of the new set.
    #[serde(default)]
    pub peers: Vec<PeerConfig>,
}

/// Parsed consensus payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusPayload {
    /// Validator-set transition, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chain_config: Option<ChainConfig>,
}

impl ConsensusPayload {
    /// Payload announcing `peers` as the next validator set.
    pub fn with_peers(peers: impl IntoIterator<Item = (u32, Secp256k1PublicKey)>) -> Self {
        Self {
            new_chain_config: Some(ChainConfig {
                peers: peers
                    .into_iter()
                    .map(|(index, key)| PeerConfig {
                        index,
                        id: key.to_hex(),
                    })
                    .collect(),
            }),
        }
    }

    /// Parse raw payload bytes. Peer ids must be valid compressed keys.
    pub fn parse(raw: &[u8]) -> Result<Self, HeaderError> {
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let payload: Self = serde_json::from_slice(raw)
            .map_err(|e| HeaderError::InvalidConsensusPayload(e.to_string()))?;
        for peer in payload.announced_peers() {
            Secp256k1PublicKey::from_hex(&peer.id).map_err(|_| {
                HeaderError::InvalidConsensusPayload(format!("peer id {} is not a public key", peer.id))
            })?;
        }
        Ok(payload)
    }

    /// JSON encoding for embedding in a header.
    pub fn to_bytes(&self) -> Vec<u8> {
        // A struct of strings and integers always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Peers of the announced set; empty when nothing is announced.
    pub fn announced_peers(&self) -> &[PeerConfig] {
        self.new_chain_config
            .as_ref()
            .map(|c| c.peers.as_slice())
            .unwrap_or(&[])
    }

    /// True if the payload announces a non-empty validator set.
    pub fn announces_rotation(&self) -> bool {
        !self.announced_peers().is_empty()
    }
}
