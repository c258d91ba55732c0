//! # QC-14 Chain Registry
//!
//! Side chains registered with the main chain.
//!
//! **Subsystem ID:** 14
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide which side chains the main chain trusts and hold their money:
//! - Deposits escrowed at registration, refunded on rejection or quit
//! - A per-chain fee pool charged by cross-chain requests and paid to relayers
//! - Two-phase deposit and cap increases proposed by the chain administrator
//! - Governance peers registered as side-chain nodes
//!
//! ## Lifecycle
//!
//! | Operation | Caller | From | To |
//! |-----------|--------|------|----|
//! | `registerSideChain` | chain admin | - | `Registered` |
//! | `approveSideChain` | registry admin | `Registered` | `Active` |
//! | `rejectSideChain` | registry admin | `Registered` | removed |
//! | `quitSideChain` | chain admin | `Active` | `Quitting` |
//! | `approveQuitSideChain` | registry admin | `Quitting` | removed |
//! | `blackSideChain` | registry admin | any | removed |
//!
//! ## Module Structure
//!
//! ```text
//! qc-14-chain-registry/
//! ├── domain/          # SideChain, InflationInfo, node table, params, errors
//! ├── adapters/        # Storage layout, in-memory peer pool
//! ├── ports/           # ChainRegistryApi, PeerPool
//! ├── application/     # ChainRegistryService
//! └── config.rs        # RegistryConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{InMemoryPeerPool, RegistryStore};
pub use application::*;
pub use config::{RegistryConfig, DEFAULT_REGISTRY_CONTRACT, DEFAULT_TOKEN_CONTRACT};
pub use domain::{
    checked_credit, invariant_side_chain_id, BlackSideChainParam, InflationInfo, InflationParam,
    InitConfigParam, NodeToSideChain, NodeToSideChainParam, QuitSideChainParam,
    RegisterSideChainParam, RegistryError, SideChain, SideChainIdParam, SideChainNodeInfo,
    SideChainStatus,
};
pub use ports::{ChainRegistryApi, PeerPool};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
