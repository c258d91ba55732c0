//! # QC-15 Cross-Chain Relay
//!
//! Exactly-once relay of requests between the main chain and its side chains.
//!
//! **Subsystem ID:** 15
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - `createCrossChainTx` charges `fee * ratio` into the destination chain's
//!   fee pool and records the request under a per-chain sequence id
//! - `processCrossChainTx` proves a side-chain request against the
//!   cross-states root of a trusted header, pays the relayer from the pool
//!   and invokes the destination contract
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | No replay | `currentID` high-water mark plus skipped-id interval set |
//! | Any delivery order | Ids above the mark are accepted, gaps stay owed |
//! | Only proven requests | Trie proof under a header with >2/3 signatures |
//! | All or nothing | Failures discard the whole staged change set |
//!
//! ## Module Structure
//!
//! ```text
//! qc-15-cross-chain/
//! ├── domain/          # RemainedIds, params, RelayError
//! ├── algorithms/      # consume_sequence
//! ├── adapters/        # Storage layout, request keys
//! ├── ports/           # CrossChainApi
//! ├── application/     # CrossChainService
//! └── config.rs        # CrossChainConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{request_key, CrossChainStore};
pub use algorithms::consume_sequence;
pub use application::*;
pub use config::{CrossChainConfig, DEFAULT_CROSS_CHAIN_CONTRACT, DEFAULT_MAX_PROOF_NODES};
pub use domain::{
    CreateCrossChainTxParam, ProcessCrossChainTxParam, RelayError, RelayedRequest, RemainedIds,
};
pub use ports::CrossChainApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
