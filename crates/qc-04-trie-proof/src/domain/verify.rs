//! # Iterative Proof Verification
//!
//! Walks an ordered root-to-leaf proof without recursion. Every proof node is
//! hashed and compared with the pointer that led to it before it is trusted.
//!
//! ## Outcomes
//!
//! | Walk ends at | Proof position | Result |
//! |--------------|----------------|--------|
//! | value | last node | `Ok(Some(value))` |
//! | value | earlier node | `ExtraProofData` |
//! | empty child or diverging path | last node | `Ok(None)` (absence) |
//! | empty child or diverging path | earlier node | `KeyMismatch` |
//! | hash reference | last node | `UnexpectedEndOfProof` |

use super::errors::ProofError;
use super::nibbles::Nibbles;
use super::node::TrieNode;
use super::{rlp, Hash};

/// Upper bound on proof length for a key of `key_len` bytes.
///
/// Every node consumes at least one nibble of the terminated path.
pub fn max_proof_depth(key_len: usize) -> usize {
    key_len * 2 + 1
}

/// Where a walk through one proof node ended.
enum Step<'a> {
    /// Continue with the node stored under this hash.
    Next(Hash, Nibbles),
    /// The path does not exist below this node.
    Absent,
    /// A value was reached.
    Value(&'a [u8]),
}

/// Verify `proof` for `key` against `root`.
///
/// Returns the proven value, or `None` if the proof shows the key is absent.
pub fn verify_proof(root: &Hash, key: &[u8], proof: &[Vec<u8>]) -> Result<Option<Vec<u8>>, ProofError> {
    let max = max_proof_depth(key.len());
    if proof.len() > max {
        return Err(ProofError::ProofTooDeep {
            depth: proof.len(),
            max,
        });
    }

    let mut path = Nibbles::from_key(key);
    let mut expected = *root;
    let last = proof.len().saturating_sub(1);

    for (index, encoded) in proof.iter().enumerate() {
        if rlp::keccak256(encoded) != expected {
            return Err(ProofError::HashMismatch { index });
        }
        let node = TrieNode::decode(encoded).map_err(|e| ProofError::InvalidNode {
            index,
            reason: e.to_string(),
        })?;

        match walk(&node, path) {
            Step::Next(hash, rest) => {
                expected = hash;
                path = rest;
            }
            Step::Absent if index == last => return Ok(None),
            Step::Absent => return Err(ProofError::KeyMismatch { index }),
            Step::Value(value) if index == last => return Ok(Some(value.to_vec())),
            Step::Value(_) => {
                return Err(ProofError::ExtraProofData {
                    index,
                    extra: last - index,
                })
            }
        }
    }

    Err(ProofError::UnexpectedEndOfProof { nodes: proof.len() })
}

/// Follow `path` through `node` and its embedded children.
fn walk(node: &TrieNode, mut path: Nibbles) -> Step<'_> {
    let mut current = node;
    loop {
        match current {
            TrieNode::Short { key, child } => {
                if !path.starts_with(key) {
                    return Step::Absent;
                }
                path = path.slice(key.len());
                current = child.as_ref();
            }
            TrieNode::Full { children } => {
                if path.is_empty() {
                    return Step::Absent;
                }
                match &children[usize::from(path.at(0))] {
                    Some(child) => {
                        path = path.slice(1);
                        current = child;
                    }
                    None => return Step::Absent,
                }
            }
            TrieNode::Hash(hash) => return Step::Next(*hash, path),
            TrieNode::Value(value) => return Step::Value(value),
        }
    }
}
