//! # Algorithms
//!
//! Header verification against a trusted validator set.

pub mod header_sync;

pub use header_sync::{verify_batch, verify_header};
