//! # Ports Module
//!
//! Inbound API. The relay's dependencies are the header-sync and registry
//! inbound ports ([`qc_13_header_sync::HeaderSyncApi`],
//! [`qc_14_chain_registry::ChainRegistryApi`]).

pub mod inbound;

pub use inbound::CrossChainApi;
