//! # Ports Layer
//!
//! Inbound API and outbound dependency traits.

pub mod inbound;
pub mod outbound;

pub use inbound::ChainRegistryApi;
pub use outbound::PeerPool;
