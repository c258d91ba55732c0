//! Domain layer for trie proofs.

pub mod errors;
pub mod nibbles;
pub mod node;
pub mod rlp;
pub mod trie;
pub mod verify;

pub use errors::*;
pub use nibbles::*;
pub use node::*;
pub use trie::*;
pub use verify::*;

pub use shared_types::Hash;
