//! # Adapters
//!
//! Storage adapter for headers, validator sets and key heights.

pub mod storage;

pub use storage::HeaderSyncStore;
