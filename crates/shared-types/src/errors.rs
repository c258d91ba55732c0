//! # Error Types
//!
//! Codec and storage errors used across subsystems.

use thiserror::Error;

/// Errors raised while decoding canonical binary data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended before a fixed-width field was complete.
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes required by the field
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },

    /// A length prefix points past the end of the input.
    #[error("Length prefix {declared} exceeds remaining input {remaining}")]
    LengthOverflow {
        /// Declared length
        declared: u64,
        /// Bytes left in the input
        remaining: usize,
    },

    /// A var-uint used a longer form than necessary.
    #[error("Non-canonical var-uint encoding")]
    NonCanonicalVarUint,

    /// A decoded integer does not fit the target width.
    #[error("Integer {value} does not fit in {target}")]
    IntegerOverflow {
        /// Decoded value
        value: u64,
        /// Target type name
        target: &'static str,
    },

    /// String field is not UTF-8.
    #[error("Invalid UTF-8 string")]
    InvalidUtf8,

    /// Address field has the wrong length.
    #[error("Invalid address length: {0}")]
    InvalidAddressLength(usize),

    /// Input has bytes left after a complete value.
    #[error("Trailing bytes after value: {0}")]
    TrailingBytes(usize),

    /// Field value outside its allowed domain.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors surfaced by a key-value storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Backend failure.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored bytes could not be decoded.
    #[error("Corrupted record at key {key}: {source}")]
    Corrupted {
        /// Hex-encoded key
        key: String,
        /// Decode failure
        source: CodecError,
    },
}

impl StorageError {
    /// Build a `Corrupted` error for a raw key.
    pub fn corrupted(key: &[u8], source: CodecError) -> Self {
        StorageError::Corrupted {
            key: hex::encode(key),
            source,
        }
    }
}
