//! # Application Layer
//!
//! Relay service implementing [`crate::ports::CrossChainApi`].

pub mod service;

pub use service::*;
