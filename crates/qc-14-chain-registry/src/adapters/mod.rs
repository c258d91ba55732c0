//! # Adapters Layer (Hexagonal Architecture)
//!
//! Storage layout and the in-memory peer pool.

mod peer_pool;
mod storage;

pub use peer_pool::InMemoryPeerPool;
pub use storage::RegistryStore;
