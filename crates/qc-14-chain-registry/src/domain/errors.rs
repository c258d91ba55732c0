//! # Domain Errors
//!
//! Error types for the side-chain registry.

use qc_02_header_codec::HeaderError;
use qc_13_header_sync::HeaderSyncError;
use shared_types::{ChainId, CodecError, ExternalCallError, StorageError};
use thiserror::Error;

use super::entities::SideChainStatus;

/// Registry error types.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The parameter blob failed to decode.
    #[error("Malformed parameters: {0}")]
    Params(#[from] CodecError),

    /// The genesis header failed to decode.
    #[error("Malformed genesis header: {0}")]
    Header(#[from] HeaderError),

    /// Seeding the header-sync subsystem failed.
    #[error("Header sync: {0}")]
    HeaderSync(#[from] HeaderSyncError),

    /// Storage backend failure or corrupted record.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A token transfer failed.
    #[error("Token transfer failed: {0}")]
    Transfer(#[from] ExternalCallError),

    /// No registry administrator configured yet.
    #[error("Registry administrator is not initialized")]
    NotInitialized,

    /// The registry administrator is already configured.
    #[error("Registry administrator already initialized")]
    AlreadyInitialized,

    /// The transaction lacks the required witness.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The genesis header names a chain id that may not be registered.
    #[error("Invalid side-chain id {chain_id}")]
    InvalidChainId {
        /// Rejected chain id
        chain_id: ChainId,
    },

    /// A side chain with this id is already registered.
    #[error("Side chain {chain_id} is already registered")]
    AlreadyRegistered {
        /// Side-chain id
        chain_id: ChainId,
    },

    /// No side chain with this id.
    #[error("Side chain {chain_id} not found")]
    SideChainNotFound {
        /// Side-chain id
        chain_id: ChainId,
    },

    /// Lifecycle precondition violated.
    #[error("Side chain {chain_id} is {actual:?}, expected {expected:?}")]
    InvalidStateTransition {
        /// Side-chain id
        chain_id: ChainId,
        /// Status the operation requires
        expected: SideChainStatus,
        /// Status found
        actual: SideChainStatus,
    },

    /// The side chain does not accept cross-chain requests in its status.
    #[error("Side chain {chain_id} is {status:?} and does not relay")]
    NotRelaying {
        /// Side-chain id
        chain_id: ChainId,
        /// Current status
        status: SideChainStatus,
    },

    /// No pending fee-pool adjustment.
    #[error("No pending inflation for side chain {chain_id}")]
    NoPendingInflation {
        /// Side-chain id
        chain_id: ChainId,
    },

    /// Checked arithmetic overflowed.
    #[error("Arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),

    /// Charging the fee would exceed the fee-pool cap.
    #[error("Side chain {chain_id}: fee {charge} on pool {pool} exceeds cap {cap}")]
    FeePoolCapExceeded {
        /// Side-chain id
        chain_id: ChainId,
        /// Accrued pool before the charge
        pool: u64,
        /// Fee charge
        charge: u64,
        /// Pool cap
        cap: u64,
    },

    /// The accrued pool cannot cover a relay fee.
    #[error("Side chain {chain_id}: pool {pool} cannot cover fee {required}")]
    InsufficientFeePool {
        /// Side-chain id
        chain_id: ChainId,
        /// Accrued pool
        pool: u64,
        /// Fee to settle
        required: u64,
    },

    /// The peer is not in the governance peer pool.
    #[error("Peer {0} is not registered in the peer pool")]
    PeerNotInPool(String),

    /// The caller does not own the peer.
    #[error("Address is not the owner of peer {0}")]
    NotPeerOwner(String),

    /// The peer is not registered to the side chain.
    #[error("Peer {peer} is not registered to side chain {chain_id}")]
    NodeNotRegistered {
        /// Side-chain id
        chain_id: ChainId,
        /// Peer public key
        peer: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::InvalidStateTransition {
            chain_id: 7,
            expected: SideChainStatus::Active,
            actual: SideChainStatus::Registered,
        };
        assert!(err.to_string().contains("is Registered, expected Active"));

        let err = RegistryError::ArithmeticOverflow("deposit");
        assert!(err.to_string().contains("deposit"));
    }
}
