//! # qc-04-trie-proof
//!
//! Merkle-Patricia trie proof verification for cross-chain relay.
//!
//! ## Role in System
//!
//! - **Relay Support**: proves that a side chain recorded a cross-chain request
//!   under its header's cross-states root
//! - **Read-Only**: verification has no side effects and no storage access
//! - **Deterministic**: node encoding and hashing are byte-exact (RLP + Keccak-256)
//!
//! ## Proof Flow
//!
//! ```text
//! [Relayer] ──proof nodes──→ verify_proof(root, key, proof)
//!                                 │
//!              ┌──────────────────┼──────────────────┐
//!              ↓                  ↓                  ↓
//!       Ok(Some(value))      Ok(None)           ProofError
//!        (inclusion)        (absence)    (hash/key mismatch, extra data)
//! ```
//!
//! ## Security
//!
//! - Every node is hashed and matched against its parent pointer before use
//! - Proof length is bounded by the key's nibble path (anti-DoS)
//! - Verification is iterative, never recursive

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;

pub use domain::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
