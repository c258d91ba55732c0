//! # Node Runtime Library
//!
//! Wires the cross-chain subsystems behind one native dispatch table.
//!
//! ## Subsystems
//!
//! | ID | Crate | Entry points |
//! |----|-------|--------------|
//! | 13 | `qc-13-header-sync` | `syncBlockHeader` (genesis is seeded by `approveSideChain`) |
//! | 14 | `qc-14-chain-registry` | `initConfig`, side-chain lifecycle, inflation, nodes |
//! | 15 | `qc-15-cross-chain` | `createCrossChainTx`, `processCrossChainTx` |
//!
//! ## Usage
//!
//! ```text
//! RuntimeConfig ──► SubsystemContainer ──► NativeRegistry::invoke(storage, env, method, input)
//!                                                   │
//!                                     Ok(NativeOutcome) / Err(NativeError)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod errors;
pub mod logging;
pub mod registry;

pub use container::{ConfigError, LoggingConfig, RuntimeConfig, SubsystemContainer};
pub use errors::{ErrorKind, NativeError};
pub use logging::init_tracing;
pub use registry::{Handler, InvocationEnv, NativeMethod, NativeOutcome, NativeRegistry};
