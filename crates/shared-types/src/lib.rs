//! # Shared Types Crate
//!
//! Types shared by every cross-chain subsystem:
//!
//! | Module | Contents |
//! |--------|----------|
//! | `entities` | `Hash`, `Address`, `ChainId`, `Notification` |
//! | `codec` | canonical `Sink`/`Source` with var-length integers |
//! | `storage` | `KvStore` port, `MemoryStore`, `StagedStore` overlay |
//! | `context` | `NativeContext` handed to every entry point |
//! | `token` | `Transfers` payload for token contract calls |
//! | `adapters` | in-memory token ledger and recording contracts |
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Byte-exact**: Every persisted or hashed structure goes through `codec`.
//! - **Atomic invocations**: Writes are staged in the context and applied
//!   only when the invocation succeeds.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod codec;
pub mod context;
pub mod entities;
pub mod errors;
pub mod storage;
pub mod token;

pub use adapters::{ContractRouter, InMemoryTokenLedger, RecordedCall, RecordingContract};
pub use codec::{Decode, Encode, Sink, Source};
pub use context::{
    Caller, ExternalCall, ExternalCallError, Invocation, NativeContext, SignerSet, Witness,
};
pub use entities::*;
pub use errors::{CodecError, StorageError};
pub use storage::{concat_key, ChangeSet, KvStore, MemoryStore, StagedStore};
pub use token::{TransferState, Transfers, TRANSFER_METHOD};
