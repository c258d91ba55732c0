//! # Cross-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Header, sync and proof verification benchmarks
//! └── src/integration/  # Registry → header sync → relay flows
//!     ├── fixtures.rs   # TestNetwork over the native runtime
//!     ├── registry_flow.rs
//!     └── relay_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::relay_flow
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod integration;
