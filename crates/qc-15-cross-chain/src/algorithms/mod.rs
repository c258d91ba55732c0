//! # Algorithms
//!
//! Sequence bookkeeping for exactly-once relay.

pub mod sequence;

pub use sequence::consume_sequence;
