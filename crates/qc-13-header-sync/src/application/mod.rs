//! # Application Layer
//!
//! Header sync service.

pub mod service;

pub use service::{HeaderSyncService, SYNC_BLOCK_HEADER_EVENT};
