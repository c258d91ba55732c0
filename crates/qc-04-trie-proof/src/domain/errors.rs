//! # Proof Errors

use thiserror::Error;

/// Malformed RLP input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RlpError {
    /// Input ended inside an item.
    #[error("RLP input too short")]
    UnexpectedEnd,

    /// Item uses a longer form than necessary.
    #[error("Non-canonical RLP encoding")]
    NonCanonical,

    /// Expected a list, found a string.
    #[error("Expected RLP list")]
    ExpectedList,

    /// Expected a string, found a list.
    #[error("Expected RLP string")]
    ExpectedString,

    /// Declared size does not fit in memory.
    #[error("RLP size overflow")]
    SizeOverflow,
}

/// Errors raised by proof verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// A proof node's hash differs from the pointer leading to it.
    #[error("Proof node {index}: hash mismatch")]
    HashMismatch {
        /// Position in the proof
        index: usize,
    },

    /// The key diverged from the trie path before the last proof node.
    #[error("Proof node {index}: key mismatch")]
    KeyMismatch {
        /// Position in the proof
        index: usize,
    },

    /// A value was reached with proof nodes left over.
    #[error("Proof node {index}: value reached with {extra} extra proof nodes")]
    ExtraProofData {
        /// Position of the node holding the value
        index: usize,
        /// Unconsumed nodes
        extra: usize,
    },

    /// The proof ran out while still pointing at a child.
    #[error("Unexpected end of proof after {nodes} nodes")]
    UnexpectedEndOfProof {
        /// Nodes supplied
        nodes: usize,
    },

    /// A proof node is not a valid trie node.
    #[error("Proof node {index}: invalid node: {reason}")]
    InvalidNode {
        /// Position in the proof
        index: usize,
        /// Decode failure
        reason: String,
    },

    /// More proof nodes than the key path can use.
    #[error("Proof too deep: {depth} nodes, max {max}")]
    ProofTooDeep {
        /// Nodes supplied
        depth: usize,
        /// Maximum for this key
        max: usize,
    },
}
