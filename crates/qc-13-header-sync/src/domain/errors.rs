//! # Domain Errors
//!
//! Error types for side-chain header synchronization.

use qc_02_header_codec::HeaderError;
use shared_crypto::CryptoError;
use shared_types::{ChainId, CodecError, StorageError};
use thiserror::Error;

/// Header sync error types.
#[derive(Debug, Error)]
pub enum HeaderSyncError {
    /// A submitted header failed to decode, or its consensus payload is invalid.
    #[error("Malformed header: {0}")]
    Header(#[from] HeaderError),

    /// The parameter blob failed to decode.
    #[error("Malformed parameters: {0}")]
    Params(#[from] CodecError),

    /// Storage backend failure or corrupted record.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// More headers than one invocation may carry.
    #[error("Header batch too large: {count} > {max}")]
    BatchTooLarge {
        /// Headers submitted
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// The chain already has a trusted genesis.
    #[error("Genesis header already initialized for chain {chain_id}")]
    AlreadyInitialized {
        /// Side-chain id
        chain_id: ChainId,
    },

    /// The genesis header does not announce a validator set.
    #[error("Genesis header of chain {chain_id} announces no validator set")]
    GenesisWithoutValidators {
        /// Side-chain id
        chain_id: ChainId,
    },

    /// No key height at or below the header's height.
    #[error("No trusted validator set for chain {chain_id} at height {height}")]
    NoTrustedValidatorSet {
        /// Side-chain id
        chain_id: ChainId,
        /// Header height
        height: u32,
    },

    /// Too few bookkeepers signed the header.
    #[error("Header {height}: {signers} signers of {validators} validators, need {required}")]
    InsufficientSigners {
        /// Header height
        height: u32,
        /// Bookkeepers on the header
        signers: usize,
        /// Size of the trusted set
        validators: usize,
        /// Minimum signers
        required: usize,
    },

    /// A bookkeeper is not in the trusted set.
    #[error("Header {height}: signer {signer} is not a trusted validator")]
    UnknownSigner {
        /// Header height
        height: u32,
        /// Hex identity of the bookkeeper
        signer: String,
    },

    /// A bookkeeper appears twice on the header.
    #[error("Header {height}: duplicate signer {signer}")]
    DuplicateSigner {
        /// Header height
        height: u32,
        /// Hex identity of the bookkeeper
        signer: String,
    },

    /// Multi-signature verification failed.
    #[error("Header {height}: invalid signature: {source}")]
    InvalidSignature {
        /// Header height
        height: u32,
        /// Underlying failure
        source: CryptoError,
    },

    /// No header at the requested height.
    #[error("No header for chain {chain_id} at height {height}")]
    HeaderNotFound {
        /// Side-chain id
        chain_id: ChainId,
        /// Requested height
        height: u32,
    },

    /// No header with the requested hash.
    #[error("No header for chain {chain_id} with hash {hash}")]
    HashNotFound {
        /// Side-chain id
        chain_id: ChainId,
        /// Hex of the requested hash
        hash: String,
    },
}

impl HeaderSyncError {
    /// True for signature-verification failures of a submitted header.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::InsufficientSigners { .. }
                | Self::UnknownSigner { .. }
                | Self::DuplicateSigner { .. }
                | Self::InvalidSignature { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeaderSyncError::InsufficientSigners {
            height: 9,
            signers: 2,
            validators: 4,
            required: 3,
        };
        assert!(err.to_string().contains("2 signers of 4"));
        assert!(err.is_verification_failure());

        let err = HeaderSyncError::NoTrustedValidatorSet {
            chain_id: 7,
            height: 3,
        };
        assert!(err.to_string().contains("chain 7"));
        assert!(!err.is_verification_failure());
    }

    #[test]
    fn test_codec_error_converts() {
        let err: HeaderSyncError = CodecError::TrailingBytes(2).into();
        assert!(matches!(err, HeaderSyncError::Params(_)));
    }
}
