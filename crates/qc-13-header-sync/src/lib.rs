//! # QC-13 Header Sync
//!
//! Light-client relay of side-chain headers on the main chain.
//!
//! **Subsystem ID:** 13
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Keep, per side chain, the headers the main chain trusts:
//! - A genesis header, handed over by the chain registry on approval, seeds
//!   the first validator set
//! - Every later header must be signed by more than two-thirds of the set
//!   effective at its height
//! - A header announcing a new set rotates the set from its own height on
//!
//! ## Verification Rules
//!
//! | Rule | Failure |
//! |------|---------|
//! | Key height `<= height` exists | `NoTrustedValidatorSet` |
//! | `3 × signers > 2 × validators` | `InsufficientSigners` |
//! | Every bookkeeper trusted | `UnknownSigner` |
//! | Bookkeepers distinct | `DuplicateSigner` |
//! | Multi-signature valid | `InvalidSignature` |
//!
//! A failure anywhere in a batch rejects the whole batch. When the registry
//! removes a chain its trusted state is retired, so a later registration of
//! the same id starts from a fresh genesis.
//!
//! ## Module Structure
//!
//! ```text
//! qc-13-header-sync/
//! ├── domain/          # ConsensusPeers, KeyHeights, invariants, params, errors
//! ├── algorithms/      # Header verification (sequential or rayon)
//! ├── adapters/        # Storage layout over KvStore
//! ├── ports/           # HeaderSyncApi
//! ├── application/     # HeaderSyncService
//! └── config.rs        # HeaderSyncConfig
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
pub use adapters::HeaderSyncStore;
pub use algorithms::{verify_batch, verify_header};
pub use application::{HeaderSyncService, SYNC_BLOCK_HEADER_EVENT};
pub use config::{HeaderSyncConfig, DEFAULT_HEADER_SYNC_CONTRACT};
pub use domain::{
    invariant_known_signers, invariant_signer_threshold, required_signers, ConsensusPeers,
    HeaderSyncError, KeyHeights, SyncBlockHeaderParam, SyncSummary,
    DEFAULT_MAX_HEADERS_PER_BATCH,
};
pub use ports::HeaderSyncApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
