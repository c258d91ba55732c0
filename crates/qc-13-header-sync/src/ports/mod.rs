//! # Ports
//!
//! Inbound API of the header-sync subsystem. Storage and the invocation
//! context come from `shared-types`.

pub mod inbound;

pub use inbound::HeaderSyncApi;
