//! # Native Errors
//!
//! One error type for every entry point, classified by [`ErrorKind`].

use qc_02_header_codec::HeaderError;
use qc_04_trie_proof::ProofError;
use qc_13_header_sync::HeaderSyncError;
use qc_14_chain_registry::RegistryError;
use qc_15_cross_chain::RelayError;
use shared_types::StorageError;
use thiserror::Error;

/// Failure of a native invocation. Nothing was committed.
#[derive(Debug, Error)]
pub enum NativeError {
    /// No entry point with this name.
    #[error("unknown native method: {0}")]
    UnknownMethod(String),

    /// Header sync failure.
    #[error("header sync: {0}")]
    HeaderSync(#[from] HeaderSyncError),

    /// Chain registry failure.
    #[error("chain registry: {0}")]
    Registry(#[from] RegistryError),

    /// Relay failure.
    #[error("cross-chain: {0}")]
    Relay(#[from] RelayError),

    /// Committing the staged writes failed.
    #[error("commit failed: {0}")]
    Commit(#[from] StorageError),
}

/// Failure classes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Parameters or embedded data failed to decode or are out of range.
    MalformedInput,
    /// Witness or ownership check failed.
    Unauthorized,
    /// A registry, header or request entry is missing.
    NotFound,
    /// The entry already exists.
    AlreadyExists,
    /// Lifecycle precondition violated.
    InvalidStateTransition,
    /// No validator set covers the header's height.
    NoTrustedValidatorSet,
    /// Too few trusted validators signed.
    InsufficientSigners,
    /// A signer is not trusted, or signed twice.
    UnknownSigner,
    /// A signature does not verify.
    InvalidSignature,
    /// No committed header at the claimed height.
    UntrustedHeader,
    /// A proof node does not hash to its parent reference.
    HashMismatch,
    /// The proof path diverges from the key.
    KeyMismatch,
    /// The proof carries nodes past its end.
    ExtraProofData,
    /// The request was already relayed.
    AlreadyProcessed,
    /// A fee, deposit or id computation overflowed.
    ArithmeticOverflow,
    /// The fee pool cannot cover the charge.
    InsufficientFunds,
    /// A token transfer was refused.
    TransferFailed,
    /// The destination call of a relayed request failed.
    RelayExecutionFailed,
    /// Storage backend failure or corrupted entry.
    Storage,
}

impl NativeError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownMethod(_) => ErrorKind::MalformedInput,
            Self::HeaderSync(e) => header_sync_kind(e),
            Self::Registry(e) => registry_kind(e),
            Self::Relay(e) => relay_kind(e),
            Self::Commit(_) => ErrorKind::Storage,
        }
    }
}

fn header_kind(e: &HeaderError) -> ErrorKind {
    match e {
        HeaderError::SignatureCheck(_) => ErrorKind::InvalidSignature,
        HeaderError::Malformed(_)
        | HeaderError::UnsupportedVersion { .. }
        | HeaderError::SignatureCountMismatch { .. }
        | HeaderError::InvalidBookkeeper(_)
        | HeaderError::InvalidSignatureEncoding(_)
        | HeaderError::InvalidConsensusPayload(_) => ErrorKind::MalformedInput,
    }
}

fn proof_kind(e: &ProofError) -> ErrorKind {
    match e {
        ProofError::HashMismatch { .. } => ErrorKind::HashMismatch,
        ProofError::KeyMismatch { .. } => ErrorKind::KeyMismatch,
        ProofError::ExtraProofData { .. } => ErrorKind::ExtraProofData,
        ProofError::UnexpectedEndOfProof { .. }
        | ProofError::InvalidNode { .. }
        | ProofError::ProofTooDeep { .. } => ErrorKind::MalformedInput,
    }
}

fn header_sync_kind(e: &HeaderSyncError) -> ErrorKind {
    use HeaderSyncError as E;
    match e {
        E::Header(e) => header_kind(e),
        E::Params(_) | E::BatchTooLarge { .. } | E::GenesisWithoutValidators { .. } => {
            ErrorKind::MalformedInput
        }
        E::Storage(_) => ErrorKind::Storage,
        E::AlreadyInitialized { .. } => ErrorKind::AlreadyExists,
        E::NoTrustedValidatorSet { .. } => ErrorKind::NoTrustedValidatorSet,
        E::InsufficientSigners { .. } => ErrorKind::InsufficientSigners,
        E::UnknownSigner { .. } | E::DuplicateSigner { .. } => ErrorKind::UnknownSigner,
        E::InvalidSignature { .. } => ErrorKind::InvalidSignature,
        E::HeaderNotFound { .. } | E::HashNotFound { .. } => ErrorKind::NotFound,
    }
}

fn registry_kind(e: &RegistryError) -> ErrorKind {
    use RegistryError as E;
    match e {
        E::Params(_) | E::InvalidChainId { .. } => ErrorKind::MalformedInput,
        E::Header(e) => header_kind(e),
        E::HeaderSync(e) => header_sync_kind(e),
        E::Storage(_) => ErrorKind::Storage,
        E::Transfer(_) => ErrorKind::TransferFailed,
        E::Unauthorized(_) | E::NotPeerOwner(_) => ErrorKind::Unauthorized,
        E::AlreadyInitialized | E::AlreadyRegistered { .. } => ErrorKind::AlreadyExists,
        E::SideChainNotFound { .. }
        | E::NoPendingInflation { .. }
        | E::PeerNotInPool(_)
        | E::NodeNotRegistered { .. } => ErrorKind::NotFound,
        E::NotInitialized
        | E::InvalidStateTransition { .. }
        | E::NotRelaying { .. }
        | E::FeePoolCapExceeded { .. } => ErrorKind::InvalidStateTransition,
        E::ArithmeticOverflow(_) => ErrorKind::ArithmeticOverflow,
        E::InsufficientFeePool { .. } => ErrorKind::InsufficientFunds,
    }
}

fn relay_kind(e: &RelayError) -> ErrorKind {
    use RelayError as E;
    match e {
        E::Params(_)
        | E::ProofTooLarge { .. }
        | E::MalformedRequest { .. }
        | E::RequestChainMismatch { .. } => ErrorKind::MalformedInput,
        E::Storage(_) => ErrorKind::Storage,
        E::HeaderSync(e) => header_sync_kind(e),
        E::Registry(e) => registry_kind(e),
        E::Proof(e) => proof_kind(e),
        E::Transfer(_) => ErrorKind::TransferFailed,
        E::Unauthorized(_) | E::ProtectedDestination { .. } => ErrorKind::Unauthorized,
        E::AlreadyProcessed { .. } => ErrorKind::AlreadyProcessed,
        E::UntrustedHeader { .. } => ErrorKind::UntrustedHeader,
        E::RequestNotFound { .. } => ErrorKind::NotFound,
        E::SequenceOverflow(_) => ErrorKind::ArithmeticOverflow,
        E::RelayExecutionFailed { .. } => ErrorKind::RelayExecutionFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CodecError;

    #[test]
    fn test_kind_of_nested_errors() {
        let err: NativeError = RelayError::Registry(RegistryError::SideChainNotFound {
            chain_id: 7,
        })
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: NativeError = RelayError::Proof(ProofError::KeyMismatch { index: 2 }).into();
        assert_eq!(err.kind(), ErrorKind::KeyMismatch);

        let err: NativeError = RegistryError::Header(HeaderError::Malformed(
            CodecError::TrailingBytes(3),
        ))
        .into();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_replay_kind() {
        let err: NativeError = RelayError::AlreadyProcessed { chain_id: 7, seq: 1 }.into();
        assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
        assert!(err.to_string().starts_with("cross-chain:"));
    }

    #[test]
    fn test_unknown_method() {
        let err = NativeError::UnknownMethod("mint".into());
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "unknown native method: mint");
    }
}
