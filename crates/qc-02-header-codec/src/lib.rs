//! # Side-Chain Header Codec (Subsystem 02)
//!
//! Versioned block-header wire format shared by the header sync engine,
//! the chain registry and the cross-chain relay.
//!
//! ## Purpose
//!
//! - Byte-exact serialization of side-chain headers
//! - Double SHA-256 header identity, memoized on first use
//! - Bookkeeper signature attachment and threshold verification
//! - Parsing of the validator-set transition carried in the consensus payload
//!
//! ## Versioned Fields
//!
//! | Field | Version 0 | Version 1 |
//! |-------|-----------|-----------|
//! | `chain_id` | absent | u64 |
//! | `parent_height` | absent | u32 |
//! | `cross_states_root` | absent | 32 bytes |
//!
//! ## Module Structure
//!
//! ```text
//! qc-02-header-codec/
//! ├── domain/
//! │   ├── header.rs     # Header, UnsignedHeader, wire format
//! │   ├── consensus.rs  # Consensus payload (validator-set transition)
//! │   └── errors.rs     # HeaderError
//! └── lib.rs
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;

pub use domain::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
