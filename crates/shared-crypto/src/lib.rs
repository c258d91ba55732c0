//! # Shared Crypto - Signing and Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Bookkeeper keys and header signatures |
//! | `multisig` | m-of-n secp256k1 | Header signature threshold checks |
//! | `hashing` | double SHA-256 | Header hashes |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, SHA-256 prehash
//! - **multisig**: each public key counts at most once

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod multisig;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{sha256, sha256d};
pub use multisig::verify_multi_signature;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
