//! # Header Errors

use shared_crypto::CryptoError;
use shared_types::CodecError;
use thiserror::Error;

/// Errors raised while decoding, parsing or verifying a header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Bytes do not form a header.
    #[error("Malformed header: {0}")]
    Malformed(#[from] CodecError),

    /// Version is newer than this codec understands.
    #[error("Unsupported header version {version} (max {max})")]
    UnsupportedVersion {
        /// Declared version
        version: u32,
        /// Highest supported version
        max: u32,
    },

    /// Bookkeeper and signature lists differ in length.
    #[error("Header has {bookkeepers} bookkeepers but {signatures} signatures")]
    SignatureCountMismatch {
        /// Bookkeeper count
        bookkeepers: usize,
        /// Signature count
        signatures: usize,
    },

    /// A bookkeeper public key is not well formed.
    #[error("Invalid bookkeeper key: {0}")]
    InvalidBookkeeper(CryptoError),

    /// A signature is not 64 bytes of `r || s`.
    #[error("Invalid signature encoding: {0}")]
    InvalidSignatureEncoding(CryptoError),

    /// Consensus payload is not a valid transition document.
    #[error("Invalid consensus payload: {0}")]
    InvalidConsensusPayload(String),

    /// Signatures do not satisfy the required threshold.
    #[error("Header signature check failed: {0}")]
    SignatureCheck(CryptoError),
}
