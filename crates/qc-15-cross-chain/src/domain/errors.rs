//! # Domain Errors
//!
//! Error types for the cross-chain relay.

use qc_04_trie_proof::ProofError;
use qc_13_header_sync::HeaderSyncError;
use qc_14_chain_registry::RegistryError;
use shared_types::{ChainId, CodecError, ExternalCallError, StorageError};
use thiserror::Error;

/// Cross-chain relay error types.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The parameter blob failed to decode.
    #[error("Malformed parameters: {0}")]
    Params(#[from] CodecError),

    /// Storage backend failure or corrupted record.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Header lookup failed.
    #[error("Header sync: {0}")]
    HeaderSync(#[from] HeaderSyncError),

    /// Side-chain lookup or fee accounting failed.
    #[error("Registry: {0}")]
    Registry(#[from] RegistryError),

    /// The proof does not hold for the trusted root.
    #[error("Proof verification failed: {0}")]
    Proof(#[from] ProofError),

    /// A fee transfer failed.
    #[error("Fee transfer failed: {0}")]
    Transfer(#[from] ExternalCallError),

    /// The transaction lacks the required witness.
    #[error("Unauthorized: missing witness of {0}")]
    Unauthorized(String),

    /// More proof nodes than allowed.
    #[error("Proof has {nodes} nodes, max {max}")]
    ProofTooLarge {
        /// Nodes supplied
        nodes: usize,
        /// Configured maximum
        max: usize,
    },

    /// The request was already relayed.
    #[error("Request {seq} of chain {chain_id} already processed")]
    AlreadyProcessed {
        /// Side-chain id
        chain_id: ChainId,
        /// Sequence id
        seq: u64,
    },

    /// No trusted header at the claimed height.
    #[error("No trusted header of chain {chain_id} at height {height}")]
    UntrustedHeader {
        /// Side-chain id
        chain_id: ChainId,
        /// Claimed height
        height: u32,
    },

    /// The proof shows no request under the key.
    #[error("Proof shows no request {seq} of chain {chain_id}")]
    RequestNotFound {
        /// Side-chain id
        chain_id: ChainId,
        /// Sequence id
        seq: u64,
    },

    /// The proven value is not a cross-chain request.
    #[error("Proven request {seq} of chain {chain_id} is malformed: {source}")]
    MalformedRequest {
        /// Side-chain id
        chain_id: ChainId,
        /// Sequence id
        seq: u64,
        /// Decode failure
        source: CodecError,
    },

    /// The proven request targets another chain.
    #[error("Proven request targets chain {declared}, relayed as chain {chain_id}")]
    RequestChainMismatch {
        /// Chain the request was relayed for
        chain_id: ChainId,
        /// Chain named in the request
        declared: ChainId,
    },

    /// The proven request targets a native contract.
    #[error("Request {seq} of chain {chain_id} targets protected contract {contract}")]
    ProtectedDestination {
        /// Side-chain id
        chain_id: ChainId,
        /// Sequence id
        seq: u64,
        /// Hex address of the destination
        contract: String,
    },

    /// Sequence ids of a chain are exhausted.
    #[error("Sequence id overflow for chain {0}")]
    SequenceOverflow(ChainId),

    /// The destination contract call failed.
    #[error("Relay of request {seq} of chain {chain_id} failed: {source}")]
    RelayExecutionFailed {
        /// Side-chain id
        chain_id: ChainId,
        /// Sequence id
        seq: u64,
        /// Destination failure
        source: ExternalCallError,
    },
}

impl RelayError {
    /// True if the failure means the request may never be relayed again.
    pub fn is_replay(&self) -> bool {
        matches!(self, RelayError::AlreadyProcessed { .. })
    }
}
