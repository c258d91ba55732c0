//! # Application Layer
//!
//! Chain registry service.

pub mod service;

pub use service::*;
