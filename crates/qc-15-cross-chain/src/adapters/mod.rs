//! # Adapters Layer (Hexagonal Architecture)
//!
//! Storage layout of the relay contract.

mod storage;

pub use storage::{request_key, CrossChainStore};
