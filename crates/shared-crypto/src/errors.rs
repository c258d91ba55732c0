//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature
    #[error("Invalid signature")]
    InvalidSignature,

    /// Fewer valid signatures than required
    #[error("Multi-signature threshold not met: {valid} valid, {required} required")]
    ThresholdNotMet {
        /// Signatures matched to distinct keys
        valid: usize,
        /// Required count
        required: usize,
    },

    /// A signature matched none of the unused public keys
    #[error("Signature {index} matches no unused public key")]
    UnmatchedSignature {
        /// Position of the signature in the list
        index: usize,
    },
}
